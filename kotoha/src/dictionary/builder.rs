//! 辞書構築のためのビルダー
//!
//! このモジュールは、語彙CSV・接続行列・未知語テンプレートの3つの
//! ソースから[`DictionaryInner`]を構築するビルダーを提供します。

use std::io::Read;

use crate::dictionary::connector::MatrixConnector;
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::unknown::UnkHandler;
use crate::dictionary::{DictionaryInner, LexType};
use crate::errors::{KotohaError, Result};

/// システム辞書のソースから[`DictionaryInner`]を構築するビルダー
pub struct SystemDictionaryBuilder {}

impl SystemDictionaryBuilder {
    /// ソースのリーダーから新しい[`DictionaryInner`]を作成します。
    ///
    /// # 引数
    ///
    ///  - `lexicon_rdr`: 語彙ファイル`lex.csv`のリーダー
    ///  - `connector_rdr`: 接続行列ファイル`matrix.def`のリーダー
    ///  - `unk_rdr`: 未知語定義ファイル`unk.def`のリーダー
    ///
    /// # エラー
    ///
    /// 入力フォーマットが不正な場合、または接続IDが行列の範囲外の場合に
    /// [`KotohaError`]を返します。
    pub fn from_readers<S, C, U>(
        mut lexicon_rdr: S,
        connector_rdr: C,
        unk_rdr: U,
    ) -> Result<DictionaryInner>
    where
        S: Read,
        C: Read,
        U: Read,
    {
        let mut lexicon_buf = vec![];
        lexicon_rdr.read_to_end(&mut lexicon_buf)?;
        let entries = Lexicon::parse_csv(&lexicon_buf, "lex.csv")?;
        let lexicon = Lexicon::from_entries(&entries, LexType::System)?;
        let connector = MatrixConnector::from_reader(connector_rdr)?;
        let unk_handler = UnkHandler::from_reader(unk_rdr)?;

        if !lexicon.verify(&connector) {
            return Err(KotohaError::invalid_format(
                "lex.csv",
                "includes connection ids outside the matrix bounds",
            ));
        }
        if !unk_handler.verify(&connector) {
            return Err(KotohaError::invalid_format(
                "unk.def",
                "includes connection ids outside the matrix bounds",
            ));
        }

        tracing::info!(entries = entries.len(), "compiled a system dictionary");

        Ok(DictionaryInner {
            lexicon,
            connector,
            unk_handler,
        })
    }
}
