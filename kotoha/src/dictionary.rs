//! トークン化のための辞書モジュール
//!
//! このモジュールは、解析に必要な辞書データの構築、シリアライズ、
//! 読み込みを行います。主な機能:
//!
//! - システム辞書（語彙・接続行列・未知語テンプレート）の構築と読み込み
//! - ユーザー辞書（語彙のみ）の構築と読み込み
//! - マジックバイト付きrkyvバイナリへの損失のないラウンドトリップ
//!
//! # 辞書のビルド
//!
//! [`SystemDictionaryBuilder`]を使用して、CSV形式のソースデータから
//! 辞書を構築できます。

pub mod builder;
pub(crate) mod connector;
pub(crate) mod lexicon;
pub(crate) mod unknown;
pub(crate) mod word_idx;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use rkyv::rancor::Error as RancorError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::MatrixConnector;
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::unknown::UnkHandler;
use crate::errors::{KotohaError, Result};

pub use crate::dictionary::builder::SystemDictionaryBuilder;
pub use crate::dictionary::word_idx::WordIdx;

/// システム辞書ファイルを識別するマジックバイト。
///
/// 末尾の数字は辞書フォーマットのバージョンであり、クレートの
/// セマンティックバージョンからは切り離されています。
pub const SYSTEM_MAGIC: &[u8] = b"kotoha dictionary 1\n";

/// ユーザー辞書ファイルを識別するマジックバイト。
pub const USER_MAGIC: &[u8] = b"kotoha userdic 1\n";

const RKYV_ALIGNMENT: usize = 16;

/// マジックバイトの直後に挿入するパディングの長さ。
///
/// アーカイブ本体の先頭をアラインメント境界に揃えます。
const fn padding_len(magic_len: usize) -> usize {
    (RKYV_ALIGNMENT - (magic_len % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT
}

/// 単語の出自（どの辞書に由来するか）
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Archive, Serialize, Deserialize,
)]
pub enum LexType {
    /// システム辞書
    #[default]
    System,
    /// ユーザー辞書
    User,
    /// 未知語
    Unknown,
}

/// [`Dictionary`]の内部データ
///
/// 語彙ストア、接続コスト行列、未知語テンプレートを保持します。
#[derive(Archive, Serialize, Deserialize)]
pub struct DictionaryInner {
    lexicon: Lexicon,
    connector: MatrixConnector,
    unk_handler: UnkHandler,
}

impl core::fmt::Debug for DictionaryInner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DictionaryInner").finish_non_exhaustive()
    }
}

impl DictionaryInner {
    /// 語彙ストアへの参照を取得します。
    #[inline(always)]
    pub(crate) const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// 接続コスト行列への参照を取得します。
    #[inline(always)]
    pub(crate) const fn connector(&self) -> &MatrixConnector {
        &self.connector
    }

    /// 未知語ハンドラーへの参照を取得します。
    #[inline(always)]
    pub(crate) const fn unk_handler(&self) -> &UnkHandler {
        &self.unk_handler
    }
}

/// トークン化のための読み取り専用システム辞書
///
/// 一度構築した辞書は変更されません。`Arc`で内部データを共有するため、
/// クローンは安価であり、複数のトークナイザー間で同じ辞書を共有できます。
#[derive(Clone)]
pub struct Dictionary {
    inner: Arc<DictionaryInner>,
}

impl core::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dictionary").finish_non_exhaustive()
    }
}

impl Dictionary {
    /// `DictionaryInner`から新しい辞書を作成します。
    pub fn from_inner(inner: DictionaryInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// 内部データへの参照を取得します。
    #[inline(always)]
    pub(crate) fn inner(&self) -> &DictionaryInner {
        &self.inner
    }

    /// 辞書をライターへシリアライズします。
    ///
    /// 出力は[`SYSTEM_MAGIC`]で始まるバイナリで、
    /// [`Dictionary::read`]で損失なく読み戻せます。
    ///
    /// # エラー
    ///
    /// 書き込みまたはシリアライズに失敗した場合にエラーを返します。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let bytes = rkyv::to_bytes::<RancorError>(self.inner.as_ref())?;
        write_archive(wtr, SYSTEM_MAGIC, &bytes)
    }

    /// リーダーから辞書を読み込みます。
    ///
    /// # エラー
    ///
    /// マジックバイトが一致しない場合、またはアーカイブが破損している
    /// 場合にエラーを返します。
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let bytes = read_archive(rdr, SYSTEM_MAGIC, "system dictionary")?;
        let archived = rkyv::access::<ArchivedDictionaryInner, RancorError>(&bytes)?;
        let inner = rkyv::deserialize::<DictionaryInner, RancorError>(archived)?;
        tracing::debug!("loaded a system dictionary");
        Ok(Self::from_inner(inner))
    }

    /// ファイルパスから辞書を読み込みます。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref())?;
        Self::read(BufReader::new(file))
    }
}

/// トークン化に重ねて使用するユーザー辞書
///
/// システム辞書と同じ語彙CSVからコンパイルされる、語彙のみの辞書です。
/// 適用すると、同じ表層形のシステムエントリより優先して照合されます。
pub struct UserDictionary {
    lexicon: Lexicon,
}

impl UserDictionary {
    /// 語彙CSVのリーダーから新しいユーザー辞書を構築します。
    ///
    /// # エラー
    ///
    /// 行のフォーマットが不正な場合に
    /// [`MalformedEntry`](KotohaError::MalformedEntry)を返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let lexicon = Lexicon::from_reader(rdr, LexType::User)?;
        Ok(Self { lexicon })
    }

    /// ユーザー辞書をライターへシリアライズします。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let bytes = rkyv::to_bytes::<RancorError>(&self.lexicon)?;
        write_archive(wtr, USER_MAGIC, &bytes)
    }

    /// リーダーからユーザー辞書を読み込みます。
    ///
    /// # エラー
    ///
    /// マジックバイトが一致しない場合、またはアーカイブが破損している
    /// 場合にエラーを返します。
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let bytes = read_archive(rdr, USER_MAGIC, "user dictionary")?;
        let archived = rkyv::access::<<Lexicon as Archive>::Archived, RancorError>(&bytes)?;
        let lexicon = rkyv::deserialize::<Lexicon, RancorError>(archived)?;
        tracing::debug!("loaded a user dictionary");
        Ok(Self { lexicon })
    }

    /// ファイルパスからユーザー辞書を読み込みます。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref())?;
        Self::read(BufReader::new(file))
    }

    /// 語彙ストアを取り出します。
    #[inline(always)]
    pub(crate) fn into_lexicon(self) -> Lexicon {
        self.lexicon
    }

    /// 語彙ストアへの参照を取得します。
    #[inline(always)]
    pub(crate) fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

/// マジックバイトとパディングに続けてアーカイブ本体を書き出します。
fn write_archive<W>(mut wtr: W, magic: &[u8], bytes: &[u8]) -> Result<()>
where
    W: Write,
{
    let mut wtr = BufWriter::new(&mut wtr);
    wtr.write_all(magic)?;
    wtr.write_all(&vec![0xFF; padding_len(magic.len())])?;
    wtr.write_all(bytes)?;
    wtr.flush()?;
    Ok(())
}

/// マジックバイトを検証し、アーカイブ本体をアラインされたバッファへ
/// 読み込みます。
fn read_archive<R>(mut rdr: R, magic: &[u8], what: &'static str) -> Result<AlignedVec>
where
    R: Read,
{
    let mut head = vec![0; magic.len() + padding_len(magic.len())];
    rdr.read_exact(&mut head).map_err(|_| {
        KotohaError::invalid_format("rdr", format!("too short to be a {what}"))
    })?;
    if !head.starts_with(magic) {
        return Err(KotohaError::invalid_format(
            "rdr",
            format!("the magic number mismatches, expected a {what}"),
        ));
    }

    let mut buffer = Vec::new();
    rdr.read_to_end(&mut buffer)?;

    let mut aligned = AlignedVec::with_capacity(buffer.len());
    aligned.extend_from_slice(&buffer);
    Ok(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON_CSV: &str = "\
自然,0,0,1,名詞,一般,*,*,*,*,自然,シゼン,シゼン,0/3,*
言語,0,0,4,名詞,一般,*,*,*,*,言語,ゲンゴ,ゲンゴ,1/3,*";
    const MATRIX_DEF: &str = "1 1\n0 0 0";
    const UNK_DEF: &str = "DEFAULT,0,0,1000,名詞,一般,*,*,*,*,*,*,*,*,*";

    fn build() -> Dictionary {
        let inner = SystemDictionaryBuilder::from_readers(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        )
        .unwrap();
        Dictionary::from_inner(inner)
    }

    #[test]
    fn test_write_read_round_trip() {
        let dict = build();
        let mut buf = vec![];
        dict.write(&mut buf).unwrap();
        assert!(buf.starts_with(SYSTEM_MAGIC));

        let loaded = Dictionary::read(buf.as_slice()).unwrap();
        let input: Vec<char> = "言語".chars().collect();
        let before: Vec<_> = dict.inner().lexicon().common_prefix_iterator(&input).collect();
        let after: Vec<_> = loaded.inner().lexicon().common_prefix_iterator(&input).collect();
        assert_eq!(before, after);
        assert_eq!(
            loaded.inner().lexicon().word_feature(after[0].word_idx),
            "名詞,一般,*,*,*,*,言語,ゲンゴ,ゲンゴ,1/3,*"
        );
    }

    #[test]
    fn test_read_rejects_wrong_magic() {
        let dict = build();
        let mut buf = vec![];
        dict.write(&mut buf).unwrap();
        assert!(UserDictionary::read(buf.as_slice()).is_err());
        assert!(Dictionary::read(&b"not a dictionary"[..]).is_err());
    }

    #[test]
    fn test_user_dictionary_round_trip() {
        let csv = "ＧＮＵ,,,1,名詞,一般,*,*,*,*,ＧＮＵ,グヌー,グヌー,2/3,*";
        let user = UserDictionary::from_reader(csv.as_bytes()).unwrap();
        let mut buf = vec![];
        user.write(&mut buf).unwrap();
        assert!(buf.starts_with(USER_MAGIC));

        let loaded = UserDictionary::read(buf.as_slice()).unwrap();
        let input: Vec<char> = "ＧＮＵ".chars().collect();
        let m: Vec<_> = loaded.lexicon().common_prefix_iterator(&input).collect();
        assert_eq!(m.len(), 1);
        assert_eq!(
            loaded.lexicon().word_feature(m[0].word_idx),
            "名詞,一般,*,*,*,*,ＧＮＵ,グヌー,グヌー,2/3,*"
        );
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let err = Dictionary::from_path("/nonexistent/system.dic").unwrap_err();
        assert!(matches!(err, KotohaError::Io(_)));
    }
}
