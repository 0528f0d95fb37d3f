//! ユーザー辞書のビルドモジュール
//!
//! このモジュールは、ユーザー語彙CSVからバイナリ形式のユーザー辞書を
//! 構築する機能を提供します。生成した辞書は解析コンテキストの
//! `apply_user_dictionary`で適用できます。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;

use kotoha::errors::KotohaError;
use kotoha::UserDictionary;

use crate::write_atomically;

/// ユーザー辞書ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "user", about = "A program to build a user dictionary.")]
pub struct Args {
    /// User lexicon file (user.csv).
    #[clap(short = 'l', long)]
    lexicon_in: PathBuf,

    /// File to which the binary user dictionary is output.
    #[clap(short = 'o', long)]
    userdic_out: PathBuf,
}

/// ユーザー辞書ビルド中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum UserError {
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

/// ユーザー辞書ビルドコマンドを実行する
///
/// 語彙CSVからユーザー辞書を構築し、バイナリ形式で出力します。
/// 不正な行があった場合は行番号・列番号付きのエラーで中断し、
/// 出力ファイルを残しません。
pub fn run(args: Args) -> Result<(), UserError> {
    println!("Compiling the user dictionary...");
    let user_dict = UserDictionary::from_reader(File::open(&args.lexicon_in)?)?;

    println!("Writing the user dictionary...");
    write_atomically::<_, UserError>(&args.userdic_out, |wtr| Ok(user_dict.write(wtr)?))?;

    println!(
        "Successfully built the user dictionary to {}",
        args.userdic_out.display()
    );
    Ok(())
}
