//! 表層形を共有する単語IDの側表
//!
//! 同じ表層形を持つエントリは複数存在しうるため、トライのリーフには
//! 単語IDそのものではなく、この側表へのオフセットを格納します。

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::FromU32;

/// 単語IDの側表
///
/// 各IDリストは長さと値を交互に並べた1本の`Vec<u32>`として格納します。
#[derive(Default, Archive, Serialize, Deserialize)]
pub struct Postings {
    data: Vec<u32>,
}

impl Postings {
    /// オフセット`i`に格納されたIDリストのイテレータを返します。
    #[inline(always)]
    pub fn ids(&'_ self, i: usize) -> impl Iterator<Item = u32> + '_ {
        let len = usize::from_u32(self.data[i]);
        self.data[i + 1..i + 1 + len].iter().cloned()
    }
}

/// 側表を構築するビルダー
#[derive(Default)]
pub struct PostingsBuilder {
    data: Vec<u32>,
}

impl PostingsBuilder {
    /// 新しいビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// IDリストを追加し、そのオフセットを返します。
    #[inline(always)]
    pub fn push(&mut self, ids: &[u32]) -> Result<usize> {
        let offset = self.data.len();
        self.data.push(ids.len().try_into()?);
        self.data.extend_from_slice(ids);
        Ok(offset)
    }

    /// 側表を構築します。
    pub fn build(self) -> Postings {
        Postings { data: self.data }
    }
}
