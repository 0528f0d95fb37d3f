//! 未知語処理モジュール
//!
//! 辞書に登録されていない文字の並びは、1文字ずつ固定コストの未知語
//! ノードとして格納します。これにより、辞書のカバレッジに関係なく
//! ラティスの経路探索は常に成立します。

use std::io::Read;

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::lexicon::{Lexicon, WordParam};
use crate::dictionary::word_idx::WordIdx;
use crate::dictionary::LexType;
use crate::errors::{KotohaError, Result};
use crate::sentence::Sentence;

/// 未知語ハンドラー
///
/// 未知語に割り当てる接続IDとコスト、および素性テンプレートを保持します。
#[derive(Archive, Serialize, Deserialize)]
pub struct UnkHandler {
    param: WordParam,
    feature: String,
}

impl UnkHandler {
    /// `unk.def`形式のリーダーから新しいインスタンスを構築します。
    ///
    /// `unk.def`は語彙CSVと同じ15フィールドの1行で、表層形フィールドには
    /// `DEFAULT`を書きます。
    ///
    /// # エラー
    ///
    /// 行が不正な場合、または定義が1行でない場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let entries = Lexicon::parse_csv(&buf, "unk.def")?;
        if entries.len() != 1 {
            return Err(KotohaError::invalid_format(
                "unk.def",
                format!("must define exactly one template, got {}", entries.len()),
            ));
        }
        let entry = &entries[0];
        Ok(Self {
            param: entry.param,
            feature: entry.feature.clone(),
        })
    }

    /// 辞書に一致しなかった位置に対して1文字の未知語を生成します。
    ///
    /// # 引数
    ///
    /// * `sent` - 入力文
    /// * `start_word` - 単語の開始位置（文字単位）
    /// * `has_matched` - この位置に辞書マッチが存在したかどうか
    /// * `f` - 生成された未知語を受け取るコールバック
    #[inline(always)]
    pub fn gen_unk_word<F>(&self, sent: &Sentence, start_word: usize, has_matched: bool, mut f: F)
    where
        F: FnMut(UnkWord),
    {
        if has_matched {
            return;
        }
        debug_assert!(start_word < sent.len_char());
        f(UnkWord {
            start_char: start_word,
            end_char: start_word + 1,
            param: self.param,
        });
    }

    /// 未知語の素性テンプレートを返します。
    #[inline(always)]
    pub fn word_feature(&self) -> &str {
        &self.feature
    }

    /// 接続IDがコネクターの範囲に収まっているかを検証します。
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorCost,
    {
        usize::from(self.param.left_id) < conn.num_left()
            && usize::from(self.param.right_id) < conn.num_right()
    }
}

/// 生成された未知語
#[derive(Debug, Clone, Copy)]
pub struct UnkWord {
    start_char: usize,
    end_char: usize,
    param: WordParam,
}

impl UnkWord {
    /// 単語の開始位置（文字単位）を返します。
    #[inline(always)]
    pub const fn start_char(&self) -> usize {
        self.start_char
    }

    /// 単語の終了位置（文字単位）を返します。
    #[inline(always)]
    pub const fn end_char(&self) -> usize {
        self.end_char
    }

    /// 単語パラメータを返します。
    #[inline(always)]
    pub const fn word_param(&self) -> WordParam {
        self.param
    }

    /// 単語インデックスを返します。
    #[inline(always)]
    pub fn word_idx(&self) -> WordIdx {
        WordIdx::new(LexType::Unknown, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNK_DEF: &str = "DEFAULT,0,0,1000,名詞,一般,*,*,*,*,*,*,*,*,*";

    #[test]
    fn test_from_reader() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        assert_eq!(unk.param, WordParam::new(0, 0, 1000));
        assert_eq!(unk.word_feature(), "名詞,一般,*,*,*,*,*,*,*,*,*");
    }

    #[test]
    fn test_gen_unk_word() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let mut sent = Sentence::new();
        sent.set_sentence("未知");
        sent.compile();

        let mut words = vec![];
        unk.gen_unk_word(&sent, 1, false, |w| words.push(w));
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].start_char(), 1);
        assert_eq!(words[0].end_char(), 2);

        words.clear();
        unk.gen_unk_word(&sent, 1, true, |w| words.push(w));
        assert!(words.is_empty());
    }

    #[test]
    fn test_multiple_templates_rejected() {
        let data = format!("{UNK_DEF}\n{UNK_DEF}");
        assert!(UnkHandler::from_reader(data.as_bytes()).is_err());
    }
}
