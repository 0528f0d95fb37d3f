//! システム辞書のビルドモジュール
//!
//! このモジュールは、辞書ソースファイル(lex.csv, matrix.def, unk.def)から
//! バイナリ形式のシステム辞書を構築する機能を提供します。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;

use kotoha::errors::KotohaError;
use kotoha::{Dictionary, SystemDictionaryBuilder};

use crate::write_atomically;

/// システム辞書ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "system", about = "A program to build the system dictionary.")]
pub struct Args {
    /// System lexicon file (lex.csv).
    #[clap(short = 'l', long)]
    lexicon_in: PathBuf,

    /// Matrix definition file (matrix.def).
    #[clap(short = 'm', long)]
    matrix_in: PathBuf,

    /// Unknown word definition file (unk.def).
    #[clap(short = 'u', long)]
    unk_in: PathBuf,

    /// File to which the binary dictionary is output.
    #[clap(short = 'o', long)]
    sysdic_out: PathBuf,
}

/// システム辞書ビルド中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Kotoha(#[from] KotohaError),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

/// システム辞書ビルドコマンドを実行する
///
/// 指定されたソースファイルから辞書を構築し、バイナリ形式で出力します。
/// 出力は一時ファイル経由で行われ、構築に失敗した場合は出力ファイルを
/// 残しません。
pub fn run(args: Args) -> Result<(), SystemError> {
    println!("Compiling the system dictionary...");
    let inner = SystemDictionaryBuilder::from_readers(
        File::open(&args.lexicon_in)?,
        File::open(&args.matrix_in)?,
        File::open(&args.unk_in)?,
    )?;
    let dict = Dictionary::from_inner(inner);

    println!("Writing the system dictionary...");
    write_atomically::<_, SystemError>(&args.sysdic_out, |wtr| Ok(dict.write(wtr)?))?;

    println!(
        "Successfully built the dictionary to {}",
        args.sysdic_out.display()
    );
    Ok(())
}
