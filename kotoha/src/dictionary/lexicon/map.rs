//! 表層形から単語IDへのマップ
//!
//! このモジュールは、ダブル配列トライと側表を組み合わせて、
//! 表層形の共通接頭辞検索から単語IDの列を引けるようにします。

pub mod posting;
pub mod trie;

use std::collections::BTreeMap;

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::lexicon::map::posting::{Postings, PostingsBuilder};
use crate::dictionary::lexicon::map::trie::Trie;
use crate::errors::Result;
use crate::utils::FromU32;

/// 表層形をトライ構造で管理するマップ
#[derive(Archive, Serialize, Deserialize)]
pub struct WordMap {
    trie: Trie,
    postings: Postings,
}

impl WordMap {
    /// 表層形のイテレータから新しいインスタンスを作成します。
    ///
    /// 表層形はイテレータ内での位置が単語IDになります。重複する表層形は
    /// すべて保持され、検索時に入力順で列挙されます。
    pub fn new<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut b = WordMapBuilder::new();
        for (i, w) in words.into_iter().enumerate() {
            b.add_record(w.as_ref().to_string(), u32::try_from(i)?);
        }
        b.build()
    }

    /// 入力の接頭辞に一致する単語を`(単語ID, 終了文字位置)`で返すイテレータ。
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = (u32, usize)> + 'a {
        self.trie.common_prefix_iterator(input).flat_map(move |e| {
            self.postings
                .ids(usize::from_u32(e.value))
                .map(move |word_id| (word_id, e.end_char))
        })
    }
}

/// 単語マップを構築するビルダー
///
/// `BTreeMap`に集約してから構築するため、同じレコード集合からは
/// 追加順に関係なく同じマップが得られます。
#[derive(Default)]
pub struct WordMapBuilder {
    map: BTreeMap<String, Vec<u32>>,
}

impl WordMapBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn add_record(&mut self, word: String, id: u32) {
        self.map.entry(word).or_default().push(id);
    }

    pub fn build(self) -> Result<WordMap> {
        let mut entries = vec![];
        let mut builder = PostingsBuilder::new();
        for (word, ids) in self.map {
            let offset = builder.push(&ids)?;
            entries.push((word, u32::try_from(offset)?));
        }
        Ok(WordMap {
            trie: Trie::from_records(&entries)?,
            postings: builder.build(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_surfaces_keep_order() {
        let map = WordMap::new(["東京", "東京都", "東京", "京都"]).unwrap();
        let input: Vec<char> = "東京都".chars().collect();
        let matches: Vec<_> = map.common_prefix_iterator(&input).collect();
        assert_eq!(matches, vec![(0, 2), (2, 2), (1, 3)]);
    }

    #[test]
    fn test_construction_is_order_independent() {
        let words = ["すもも", "もも", "の", "うち", "もも"];
        let map = WordMap::new(words).unwrap();

        // Feed the same records in a different order through the builder.
        // Records sharing a surface keep their relative order.
        let mut b = WordMapBuilder::new();
        for &(i, w) in &[(2usize, "の"), (0, "すもも"), (1, "もも"), (4, "もも"), (3, "うち")] {
            b.add_record(w.to_string(), u32::try_from(i).unwrap());
        }
        let reordered = b.build().unwrap();

        for text in ["すもももももももものうち", "もも", "うち"] {
            let input: Vec<char> = text.chars().collect();
            let a: Vec<_> = map.common_prefix_iterator(&input).collect();
            let b: Vec<_> = reordered.common_prefix_iterator(&input).collect();
            assert_eq!(a, b);
        }
    }
}
