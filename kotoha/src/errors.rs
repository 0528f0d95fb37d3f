//! エラー型の定義
//!
//! このモジュールは、kotohaライブラリで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt;

/// kotoha専用のResult型
///
/// エラー型としてデフォルトで[`KotohaError`]を使用します。
pub type Result<T, E = KotohaError> = std::result::Result<T, E>;

/// kotohaのエラー型
///
/// ライブラリで発生する可能性のあるすべてのエラーを表現します。
/// 各バリアントは特定のエラー条件に対応しています。
#[derive(Debug, thiserror::Error)]
pub enum KotohaError {
    /// 入力テキストが不正な場合のエラー
    ///
    /// [`InvalidInputError`]のエラーバリアント。
    #[error(transparent)]
    InvalidInput(InvalidInputError),

    /// 辞書ソースの行が不正な場合のエラー
    ///
    /// [`MalformedEntryError`]のエラーバリアント。
    /// 該当する行番号と列番号を保持します。
    #[error(transparent)]
    MalformedEntry(MalformedEntryError),

    /// 入力フォーマットが不正な場合のエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 整数変換エラー
    ///
    /// [`TryFromIntError`](std::num::TryFromIntError)のエラーバリアント。
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// rkyvシリアライゼーションエラー
    ///
    /// [`rkyv::rancor::Error`]のエラーバリアント。
    #[error(transparent)]
    Serialize(#[from] rkyv::rancor::Error),
}

impl KotohaError {
    /// 入力テキストが不正な場合のエラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_input<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidInput(InvalidInputError { msg: msg.into() })
    }

    /// 辞書ソース行が不正な場合のエラーを生成します
    ///
    /// # 引数
    ///
    /// * `source_name` - ソースの名前（例: `lex.csv`）
    /// * `row` - 1始まりの行番号
    /// * `column` - 1始まりの列番号
    /// * `msg` - エラーメッセージ
    pub(crate) fn malformed_entry<S>(
        source_name: &'static str,
        row: usize,
        column: usize,
        msg: S,
    ) -> Self
    where
        S: Into<String>,
    {
        Self::MalformedEntry(MalformedEntryError {
            source_name,
            row,
            column,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }
}

/// 入力テキストが不正な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidInputError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidInputError: {}", self.msg)
    }
}

impl Error for InvalidInputError {}

/// 辞書ソースの行が不正な場合に使用されるエラー
///
/// コンパイルを中断した行と列を1始まりで報告します。
#[derive(Debug)]
pub struct MalformedEntryError {
    /// ソースの名前
    pub(crate) source_name: &'static str,

    /// 1始まりの行番号
    pub(crate) row: usize,

    /// 1始まりの列番号
    pub(crate) column: usize,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl MalformedEntryError {
    /// エラーが発生した行番号を返します（1始まり）。
    pub fn row(&self) -> usize {
        self.row
    }

    /// エラーが発生した列番号を返します（1始まり）。
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for MalformedEntryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "MalformedEntryError: {}: row {}, column {}: {}",
            self.source_name, self.row, self.column, self.msg
        )
    }
}

impl Error for MalformedEntryError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

impl From<std::str::Utf8Error> for KotohaError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::invalid_input(error.to_string())
    }
}
