//! アクセント推定器のインタフェース
//!
//! パイプラインはアクセント型解決の後に注入点を持ち、外部の推定器が
//! ノード列からアクセント型を計算し直せます。推定器は「ノード列を
//! 受け取り、改訂済みのアクセント型を返す」能力として抽象化されて
//! おり、既定の実装は何もしません。

use crate::node::FeatureNode;

/// アクセント型を推定する能力
///
/// 実装は[`Kotoha::with_accent_estimator`](crate::Kotoha::with_accent_estimator)
/// で注入します。
pub trait AccentEstimator {
    /// ノード列からアクセント型を推定します。
    ///
    /// # 戻り値
    ///
    /// ノードごとの改訂済みアクセント型。`None`を返すと、パイプラインの
    /// 解決結果がそのまま使われます。ノード数と長さの合わない列は
    /// 無視されます。
    fn estimate(&self, nodes: &[FeatureNode]) -> Option<Vec<i32>>;
}

/// 何もしない既定の推定器
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAccentEstimator;

impl AccentEstimator for NoopAccentEstimator {
    fn estimate(&self, _nodes: &[FeatureNode]) -> Option<Vec<i32>> {
        None
    }
}
