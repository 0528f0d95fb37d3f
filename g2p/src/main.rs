//! 音素・カナ変換を実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだテキストを1行ずつ変換し、
//! 指定された出力形式（phone、kana、detail）で結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use kotoha::{G2pOption, Kotoha};

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Phone,
    Kana,
    Detail,
}

/// `OutputMode`の`FromStr`実装
impl FromStr for OutputMode {
    type Err = &'static str;

    /// 文字列から出力モードをパースする
    ///
    /// # 引数
    ///
    /// * `mode` - パース対象の文字列（"phone"、"kana"、"detail"のいずれか）
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "phone" => Ok(Self::Phone),
            "kana" => Ok(Self::Kana),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "g2p", about = "Converts Japanese text into phone or kana strings")]
struct Args {
    /// System dictionary.
    #[clap(short = 'i', long)]
    sysdic: PathBuf,

    /// User dictionary applied on top of the system dictionary.
    #[clap(short = 'u', long)]
    userdic: Option<PathBuf>,

    /// Output mode. Choices are phone, kana, and detail.
    #[clap(short = 'O', long, default_value = "phone")]
    output_mode: OutputMode,
}

/// メイン関数
///
/// 辞書をロードし、標準入力から読み込んだテキストを変換して、
/// 指定された形式で結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the dictionary...");
    let analyzer = Kotoha::from_path(&args.sysdic)?;
    if let Some(userdic) = &args.userdic {
        analyzer.apply_user_dictionary(userdic)?;
    }

    eprintln!("Ready to convert");

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        match args.output_mode {
            OutputMode::Phone => {
                let phones = analyzer.g2p(&line, &G2pOption::default());
                out.write_all(phones.into_string().as_bytes())?;
                out.write_all(b"\n")?;
            }
            OutputMode::Kana => {
                let kana = analyzer.g2p(&line, &G2pOption { kana: true, join: true });
                out.write_all(kana.into_string().as_bytes())?;
                out.write_all(b"\n")?;
            }
            OutputMode::Detail => {
                for node in analyzer.run_frontend(&line) {
                    writeln!(
                        &mut out,
                        "{}\t{},{},{},{}\tpron={}\tacc={}/{}\tchain={}",
                        node.surface,
                        node.pos,
                        node.pos_group1,
                        node.pos_group2,
                        node.pos_group3,
                        node.pron,
                        node.acc,
                        node.mora_size,
                        node.chain_flag,
                    )?;
                }
                out.write_all(b"EOS\n")?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
