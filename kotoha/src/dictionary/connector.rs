//! 接続コスト計算のためのコネクター
//!
//! このモジュールは、隣接する単語間の接続コストを計算するための
//! コネクター実装を提供します。

use std::io::{BufRead, BufReader, Read};

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{KotohaError, Result};

/// 接続コスト計算機能を提供するトレイト
pub trait ConnectorCost {
    /// 左接続IDの総数を返します。
    fn num_left(&self) -> usize;

    /// 右接続IDの総数を返します。
    fn num_right(&self) -> usize;

    /// 接続コストを取得します。
    ///
    /// # 引数
    ///
    /// * `right_id` - 先行する単語の右文脈ID
    /// * `left_id` - 後続する単語の左文脈ID
    fn cost(&self, right_id: u16, left_id: u16) -> i32;
}

/// 接続コスト行列
///
/// `matrix.def`形式のテキストから構築します。1行目が
/// `右文脈IDの総数 左文脈IDの総数`、以降の各行が`右ID 左ID コスト`です。
/// 定義されない組のコストは`0`です。
#[derive(Archive, Serialize, Deserialize)]
pub struct MatrixConnector {
    data: Vec<i16>,
    num_right: usize,
    num_left: usize,
}

impl MatrixConnector {
    /// 新しいインスタンスを作成します。
    pub(crate) fn new(data: Vec<i16>, num_right: usize, num_left: usize) -> Self {
        debug_assert_eq!(data.len(), num_right * num_left);
        Self {
            data,
            num_right,
            num_left,
        }
    }

    /// `matrix.def`形式のリーダーから新しいインスタンスを構築します。
    ///
    /// # エラー
    ///
    /// ヘッダ行がない場合、数値が読めない場合、IDが範囲外の場合に
    /// エラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let rdr = BufReader::new(rdr);
        let mut lines = rdr.lines();

        let header = lines.next().ok_or_else(|| {
            KotohaError::invalid_format("matrix.def", "the header line is missing")
        })??;
        let mut it = header.split_ascii_whitespace();
        let num_right: usize = Self::parse_field(it.next(), "the number of right ids")?;
        let num_left: usize = Self::parse_field(it.next(), "the number of left ids")?;
        if num_right == 0 || num_left == 0 {
            return Err(KotohaError::invalid_format(
                "matrix.def",
                "the number of ids must be positive",
            ));
        }

        let mut data = vec![0; num_right * num_left];
        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut it = line.split_ascii_whitespace();
            let right_id: usize = Self::parse_field(it.next(), "a right id")?;
            let left_id: usize = Self::parse_field(it.next(), "a left id")?;
            let cost: i16 = Self::parse_field(it.next(), "a cost")?;
            if num_right <= right_id || num_left <= left_id {
                return Err(KotohaError::invalid_format(
                    "matrix.def",
                    format!("context ids must be within the header bounds, got {line:?}"),
                ));
            }
            data[right_id * num_left + left_id] = cost;
        }

        Ok(Self::new(data, num_right, num_left))
    }

    fn parse_field<T>(field: Option<&str>, what: &str) -> Result<T>
    where
        T: std::str::FromStr,
    {
        field
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| KotohaError::invalid_format("matrix.def", format!("{what} is missing or invalid")))
    }
}

impl ConnectorCost for MatrixConnector {
    #[inline(always)]
    fn num_left(&self) -> usize {
        self.num_left
    }

    #[inline(always)]
    fn num_right(&self) -> usize {
        self.num_right
    }

    #[inline(always)]
    fn cost(&self, right_id: u16, left_id: u16) -> i32 {
        debug_assert!(usize::from(right_id) < self.num_right);
        debug_assert!(usize::from(left_id) < self.num_left);
        let index = usize::from(right_id) * self.num_left + usize::from(left_id);
        i32::from(self.data[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader() {
        let data = "2 2\n0 0 0\n0 1 -3\n1 0 5\n1 1 7";
        let conn = MatrixConnector::from_reader(data.as_bytes()).unwrap();
        assert_eq!(conn.num_right(), 2);
        assert_eq!(conn.num_left(), 2);
        assert_eq!(conn.cost(0, 1), -3);
        assert_eq!(conn.cost(1, 0), 5);
        assert_eq!(conn.cost(1, 1), 7);
    }

    #[test]
    fn test_undefined_pairs_cost_zero() {
        let data = "2 2\n1 1 9";
        let conn = MatrixConnector::from_reader(data.as_bytes()).unwrap();
        assert_eq!(conn.cost(0, 0), 0);
        assert_eq!(conn.cost(1, 1), 9);
    }

    #[test]
    fn test_out_of_range_id() {
        let data = "1 1\n0 1 2";
        assert!(MatrixConnector::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_header() {
        assert!(MatrixConnector::from_reader(&b""[..]).is_err());
    }
}
