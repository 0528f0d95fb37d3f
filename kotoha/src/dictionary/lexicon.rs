//! 辞書の語彙情報を管理するモジュール
//!
//! このモジュールは、単語の表層形、パラメータ、素性情報を管理する
//! 語彙データ構造と、語彙CSVのパーサを提供します。
//!
//! # 語彙CSVのフォーマット
//!
//! 1行が1エントリで、次の15フィールドを固定で持ちます:
//!
//! ```text
//! 表層形,左文脈ID,右文脈ID,コスト,品詞,品詞細分類1,品詞細分類2,品詞細分類3,
//! 活用型,活用形,原形,読み,発音,アクセント型/モーラ数,連鎖規則
//! ```
//!
//! 左右の文脈IDは空欄を許し、その場合は`0`として扱います。
//! アクセント欄は`*`または`型/モーラ数`（例: `1/5`）です。
//! フィールド数や型が合わない行は、行番号と列番号を添えた
//! [`MalformedEntry`](crate::errors::KotohaError::MalformedEntry)で
//! コンパイルを中断します。

mod feature;
pub(crate) mod map;
mod param;

use std::io::Read;

use csv_core::ReadFieldResult;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::lexicon::feature::WordFeatures;
use crate::dictionary::lexicon::map::WordMap;
use crate::dictionary::lexicon::param::WordParams;
use crate::dictionary::word_idx::WordIdx;
use crate::dictionary::LexType;
use crate::errors::{KotohaError, Result};
use crate::node::parse_acc_mora;
use crate::utils::FromU32;

pub use crate::dictionary::lexicon::param::WordParam;

/// 語彙CSVの固定フィールド数。
pub const NUM_LEXICON_FIELDS: usize = 15;

/// 単語の語彙情報
///
/// コンパイル済みの語彙ストアです。表層形のトライ、単語パラメータ、
/// 素性文字列の3つの側表から構成されます。
#[derive(Archive, Serialize, Deserialize)]
pub struct Lexicon {
    map: WordMap,
    params: WordParams,
    features: WordFeatures,
    lex_type: LexType,
}

impl core::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lexicon")
            .field("lex_type", &self.lex_type)
            .finish_non_exhaustive()
    }
}

impl Lexicon {
    /// 入力文字列の共通接頭辞に一致する単語を返すイテレータを取得します。
    ///
    /// # 引数
    ///
    /// * `input` - 入力文字列
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = LexMatch> + 'a {
        self.map
            .common_prefix_iterator(input)
            .map(move |(word_id, end_char)| {
                LexMatch::new(
                    WordIdx::new(self.lex_type, word_id),
                    self.params.get(usize::from_u32(word_id)),
                    end_char,
                )
            })
    }

    /// 単語のパラメータを取得します。
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.params.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の素性を取得します。
    #[inline(always)]
    pub fn word_feature(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.features.get(usize::from_u32(word_idx.word_id))
    }

    /// 左右の接続IDがコネクターの範囲に収まっているかを検証します。
    ///
    /// # 戻り値
    ///
    /// すべてのIDが有効な場合は`true`
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorCost,
    {
        for i in 0..self.params.len() {
            let p = self.params.get(i);
            if conn.num_left() <= usize::from(p.left_id) {
                return false;
            }
            if conn.num_right() <= usize::from(p.right_id) {
                return false;
            }
        }
        true
    }

    /// エントリのリストから新しいインスタンスを構築します。
    ///
    /// エントリは表層形で安定ソートしてから格納するため、同じエントリ集合
    /// からは入力順に関係なく同じ語彙ストアが構築されます。
    pub fn from_entries(entries: &[RawWordEntry], lex_type: LexType) -> Result<Self> {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| entries[a].surface.cmp(&entries[b].surface));

        let map = WordMap::new(order.iter().map(|&i| &entries[i].surface))?;
        let params = WordParams::new(order.iter().map(|&i| entries[i].param));
        let features = WordFeatures::new(order.iter().map(|&i| &entries[i].feature));

        Ok(Self {
            map,
            params,
            features,
            lex_type,
        })
    }

    /// CSV形式の語彙ファイルから新しいインスタンスを構築します。
    ///
    /// # エラー
    ///
    /// 行のフォーマットが不正な場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R, lex_type: LexType) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;

        let entries = Self::parse_csv(&buf, "lex.csv")?;

        Self::from_entries(&entries, lex_type)
    }

    /// 語彙CSVをパースします。
    ///
    /// 空行は読み飛ばします。不正な行は1始まりの行番号・列番号付きの
    /// エラーになります。
    pub(crate) fn parse_csv(bytes: &[u8], name: &'static str) -> Result<Vec<RawWordEntry>> {
        let mut entries = vec![];

        let mut rdr = csv_core::Reader::new();
        let mut bytes = bytes;
        let mut output = [0; 4096];
        let mut fields: Vec<String> = vec![];
        let mut row = 1;

        loop {
            let (result, nin, nout) = rdr.read_field(bytes, &mut output);
            bytes = &bytes[nin..];
            match result {
                ReadFieldResult::InputEmpty => {}
                ReadFieldResult::OutputFull => {
                    return Err(KotohaError::malformed_entry(
                        name,
                        row,
                        fields.len() + 1,
                        "field too large",
                    ));
                }
                ReadFieldResult::Field { record_end } => {
                    fields.push(std::str::from_utf8(&output[..nout])?.to_string());
                    if record_end {
                        // A lone empty field is a blank line.
                        if !(fields.len() == 1 && fields[0].is_empty()) {
                            entries.push(Self::parse_record(&fields, name, row)?);
                        }
                        fields.clear();
                        row += 1;
                    }
                }
                ReadFieldResult::End => break,
            }
        }
        Ok(entries)
    }

    /// 1レコードを型付きのエントリに変換します。
    fn parse_record(fields: &[String], name: &'static str, row: usize) -> Result<RawWordEntry> {
        if fields.len() != NUM_LEXICON_FIELDS {
            return Err(KotohaError::malformed_entry(
                name,
                row,
                fields.len().min(NUM_LEXICON_FIELDS) + 1,
                format!(
                    "a lexicon row must have exactly {} fields, got {}",
                    NUM_LEXICON_FIELDS,
                    fields.len()
                ),
            ));
        }

        let surface = fields[0].clone();
        if surface.is_empty() {
            return Err(KotohaError::malformed_entry(
                name,
                row,
                1,
                "the surface form must not be empty",
            ));
        }

        let left_id = Self::parse_context_id(&fields[1], name, row, 2)?;
        let right_id = Self::parse_context_id(&fields[2], name, row, 3)?;
        let word_cost: i16 = fields[3].parse().map_err(|_| {
            KotohaError::malformed_entry(name, row, 4, format!("invalid cost {:?}", fields[3]))
        })?;

        let acc_mora = &fields[13];
        if parse_acc_mora(acc_mora).is_none() {
            return Err(KotohaError::malformed_entry(
                name,
                row,
                14,
                format!("invalid accent field {acc_mora:?}, expected `*` or `TYPE/MORAS`"),
            ));
        }

        Ok(RawWordEntry {
            surface,
            param: WordParam::new(left_id, right_id, word_cost),
            feature: fields[4..].join(","),
        })
    }

    /// 文脈IDをパースします。空欄は`0`として扱います。
    fn parse_context_id(
        field: &str,
        name: &'static str,
        row: usize,
        column: usize,
    ) -> Result<u16> {
        if field.is_empty() {
            return Ok(0);
        }
        field.parse().map_err(|_| {
            KotohaError::malformed_entry(
                name,
                row,
                column,
                format!("invalid context id {field:?}"),
            )
        })
    }
}

/// 語彙マッチング結果
#[derive(Eq, PartialEq, Debug)]
pub struct LexMatch {
    pub word_idx: WordIdx,
    pub word_param: WordParam,
    pub end_char: usize,
}

impl LexMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(word_idx: WordIdx, word_param: WordParam, end_char: usize) -> Self {
        Self {
            word_idx,
            word_param,
            end_char,
        }
    }
}

/// 生の単語エントリ
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawWordEntry {
    pub surface: String,
    pub param: WordParam,
    pub feature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(surface: &str, cost: i16, read: &str, acc_mora: &str) -> String {
        format!("{surface},0,0,{cost},名詞,一般,*,*,*,*,{surface},{read},{read},{acc_mora},*")
    }

    #[test]
    fn test_from_reader() {
        let data = format!("{}\n{}", row("自然", 10, "シゼン", "0/3"), row("言語", -4, "ゲンゴ", "1/3"));
        let lex = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap();

        let input: Vec<char> = "言語".chars().collect();
        let m: Vec<_> = lex.common_prefix_iterator(&input).collect();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].word_param, WordParam::new(0, 0, -4));
        assert_eq!(m[0].end_char, 2);
        assert_eq!(
            lex.word_feature(m[0].word_idx),
            "名詞,一般,*,*,*,*,言語,ゲンゴ,ゲンゴ,1/3,*"
        );
    }

    #[test]
    fn test_duplicate_surfaces_are_kept() {
        let data = format!("{}\n{}", row("端", 1, "ハシ", "0/2"), row("端", 2, "ハナ", "1/2"));
        let lex = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap();
        let input: Vec<char> = "端".chars().collect();
        let m: Vec<_> = lex.common_prefix_iterator(&input).collect();
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].word_param.word_cost, 1);
        assert_eq!(m[1].word_param.word_cost, 2);
    }

    #[test]
    fn test_empty_context_ids_default_to_zero() {
        let data = "ＧＮＵ,,,1,名詞,一般,*,*,*,*,ＧＮＵ,グヌー,グヌー,2/3,*";
        let lex = Lexicon::from_reader(data.as_bytes(), LexType::User).unwrap();
        let input: Vec<char> = "ＧＮＵ".chars().collect();
        let m: Vec<_> = lex.common_prefix_iterator(&input).collect();
        assert_eq!(m[0].word_param, WordParam::new(0, 0, 1));
    }

    #[test]
    fn test_few_fields_reports_row_and_column() {
        let data = format!("{}\n自然,0,2", row("言語", 0, "ゲンゴ", "1/3"));
        let err = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap_err();
        match err {
            KotohaError::MalformedEntry(e) => {
                assert_eq!(e.row(), 2);
                assert_eq!(e.column(), 4);
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_invalid_cost() {
        let data = "自然,0,0,コスト,名詞,一般,*,*,*,*,自然,シゼン,シゼン,0/3,*";
        let err = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap_err();
        match err {
            KotohaError::MalformedEntry(e) => {
                assert_eq!(e.row(), 1);
                assert_eq!(e.column(), 4);
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_invalid_context_id() {
        let data = "自然,-2,0,1,名詞,一般,*,*,*,*,自然,シゼン,シゼン,0/3,*";
        assert!(Lexicon::from_reader(data.as_bytes(), LexType::System).is_err());
    }

    #[test]
    fn test_invalid_accent_field() {
        let data = "自然,0,0,1,名詞,一般,*,*,*,*,自然,シゼン,シゼン,三/3,*";
        let err = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap_err();
        match err {
            KotohaError::MalformedEntry(e) => assert_eq!(e.column(), 14),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        let data = ",0,0,1,名詞,一般,*,*,*,*,*,ア,ア,0/1,*";
        let err = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap_err();
        match err {
            KotohaError::MalformedEntry(e) => {
                assert_eq!(e.row(), 1);
                assert_eq!(e.column(), 1);
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_empty_input_is_an_empty_lexicon() {
        let lex = Lexicon::from_reader(&b""[..], LexType::System).unwrap();
        let input: Vec<char> = "あ".chars().collect();
        assert_eq!(lex.common_prefix_iterator(&input).count(), 0);
    }
}
