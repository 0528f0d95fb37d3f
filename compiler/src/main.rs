//! kotoha辞書コンパイラのメインエントリーポイント
//!
//! このモジュールは、解析用の辞書をビルドするためのサブコマンドを
//! 提供します。システム辞書とユーザー辞書のコンパイルを統合した
//! CLIツールです。

mod system;
mod user;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use thiserror::Error;

use crate::system::SystemError;
use crate::user::UserError;

/// コマンドライン引数の構造体
///
/// `clap`を使用してコマンドライン引数をパースします。
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// ソースファイルからバイナリのシステム辞書を構築します
    ///
    /// 辞書ソースファイル(lex.csv, matrix.def, unk.def)からバイナリ形式の
    /// システム辞書を生成します。
    System(system::Args),

    /// 語彙CSVからバイナリのユーザー辞書を構築します
    ///
    /// ユーザー語彙CSVから、解析コンテキストへ適用できるバイナリ形式の
    /// ユーザー辞書を生成します。
    User(user::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CompileError {
    /// システム辞書ビルド中のエラー
    #[error(transparent)]
    System(#[from] SystemError),
    /// ユーザー辞書ビルド中のエラー
    #[error(transparent)]
    User(#[from] UserError),
}

/// 出力先と同じディレクトリの一時ファイルへ書き込み、成功した場合に
/// のみ出力先へ改名します。
///
/// コンパイルが途中で失敗しても、中途半端な辞書ファイルは残りません。
pub(crate) fn write_atomically<F, E>(out_path: &Path, write: F) -> Result<(), E>
where
    F: FnOnce(&mut dyn Write) -> Result<(), E>,
    E: From<std::io::Error> + From<tempfile::PersistError>,
{
    let dir = out_path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut file = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };
    write(&mut file)?;
    file.flush()?;
    file.persist(out_path)?;
    Ok(())
}

/// メイン関数
///
/// コマンドライン引数をパースし、指定されたサブコマンドを実行します。
fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::System(args) => Ok(system::run(args)?),
        Command::User(args) => Ok(user::run(args)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::system::SystemError;

    #[test]
    fn test_write_atomically_leaves_no_file_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.dic");

        let result: Result<(), SystemError> = write_atomically(&out, |_wtr| {
            Err(SystemError::Io(std::io::Error::other("boom")))
        });
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_write_atomically_persists_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.dic");

        let result: Result<(), SystemError> =
            write_atomically(&out, |wtr| Ok(wtr.write_all(b"ok")?));
        assert!(result.is_ok());
        assert_eq!(std::fs::read(&out).unwrap(), b"ok");
    }
}
