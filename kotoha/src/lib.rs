//! # kotoha
//!
//! kotohaは、日本語テキストを音声合成向けの音韻・韻律表現へ変換する
//! テキスト処理フロントエンドです。
//!
//! ## 概要
//!
//! パイプラインは次の段から構成されます:
//!
//! - **トークナイザー**: ダブル配列トライの辞書引きと最小コスト経路探索に
//!   よる分かち書き
//! - **書き換えパイプライン**: 発音・数字読み・アクセント句・アクセント核の
//!   解決を行う固定順のパス列
//! - **ラベル変換**: 注釈済みノード列から音素・モーラ単位のラベル列を生成
//! - **フォーマッタ**: 音素記号列またはカナ列としての描画
//!
//! 辞書はCSVソースからコンパイルして使用します。コンパイル済みの
//! ユーザー辞書を解析コンテキストへ原子的に適用することで、システム
//! 辞書を再コンパイルせずに語の読みを差し替えられます。
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), kotoha::errors::KotohaError> {
//! use kotoha::{Dictionary, G2pOption, Kotoha, SystemDictionaryBuilder};
//!
//! let lexicon_csv =
//!     "こんにちは,0,0,10,感動詞,*,*,*,*,*,こんにちは,コンニチハ,コンニチワ,0/5,*";
//! let matrix_def = "1 1\n0 0 0";
//! let unk_def = "DEFAULT,0,0,1000,名詞,一般,*,*,*,*,*,*,*,*,*";
//!
//! let dict = SystemDictionaryBuilder::from_readers(
//!     lexicon_csv.as_bytes(),
//!     matrix_def.as_bytes(),
//!     unk_def.as_bytes(),
//! )?;
//!
//! let analyzer = Kotoha::new(Dictionary::from_inner(dict));
//! let phones = analyzer.g2p("こんにちは", &G2pOption::default());
//! assert_eq!(phones.into_string(), "k o N n i ch i w a");
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 解析コンテキスト
pub mod analyzer;

/// 共通の定数定義
mod common;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// アクセント推定器のインタフェース
pub mod estimator;

/// 出力フォーマッタ
pub mod format;

/// 音素・モーララベルへの変換
pub mod label;

/// モーラと音素記号の変換
pub mod mora;

/// 素性ノードの定義
pub mod node;

/// 書き換えパイプライン
pub mod rewrite;

/// 文の内部表現
mod sentence;

/// トークン型の定義
pub mod token;

/// トークナイザーの実装
pub mod tokenizer;

/// 内部ユーティリティ関数
mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use analyzer::Kotoha;
pub use dictionary::{Dictionary, LexType, SystemDictionaryBuilder, UserDictionary};
pub use errors::KotohaError;
pub use estimator::{AccentEstimator, NoopAccentEstimator};
pub use format::{G2pOption, G2pOutput};
pub use label::{Label, PauseKind};
pub use node::FeatureNode;
pub use tokenizer::Tokenizer;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
