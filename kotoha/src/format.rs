//! 出力フォーマッタ
//!
//! このモジュールは、ラベル列を音素記号列またはカナ列として描画します。
//! 描画は副作用のない全域関数で、空のラベル列は空の出力になります。

use crate::label::Label;

/// g2p出力のオプション
#[derive(Debug, Clone)]
pub struct G2pOption {
    /// `true`ならカナ、`false`なら音素記号で描画します。
    pub kana: bool,
    /// `true`なら1つの文字列に結合し、`false`なら記号の列を返します。
    pub join: bool,
}

impl Default for G2pOption {
    fn default() -> Self {
        Self {
            kana: false,
            join: true,
        }
    }
}

/// g2pの出力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum G2pOutput {
    /// 結合済みの文字列（`join: true`）
    Joined(String),
    /// 記号の列（`join: false`）
    Symbols(Vec<String>),
}

impl G2pOutput {
    /// 結合済みの文字列を取り出します。記号の列は空白で結合します。
    pub fn into_string(self) -> String {
        match self {
            Self::Joined(s) => s,
            Self::Symbols(v) => v.join(" "),
        }
    }

    /// 記号の列を取り出します。結合済みの文字列は1要素の列になります。
    pub fn into_symbols(self) -> Vec<String> {
        match self {
            Self::Joined(s) if s.is_empty() => vec![],
            Self::Joined(s) => vec![s],
            Self::Symbols(v) => v,
        }
    }
}

/// ラベル列を描画します。
///
/// 音素モードではポーズは`pau`になります。カナモードではモーラの
/// カナ表記を並べ、ポーズは描画しません。
pub fn render(labels: &[Label], opt: &G2pOption) -> G2pOutput {
    let symbols: Vec<String> = if opt.kana {
        labels
            .iter()
            .filter(|label| label.pause.is_none())
            .filter_map(|label| label.mora.clone())
            .collect()
    } else {
        labels.iter().map(|label| label.phoneme.clone()).collect()
    };

    if opt.join {
        let separator = if opt.kana { "" } else { " " };
        G2pOutput::Joined(symbols.join(separator))
    } else {
        G2pOutput::Symbols(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::convert;
    use crate::node::FeatureNode;

    fn labels() -> Vec<Label> {
        let mut node = FeatureNode::from_feature(
            "こんにちは",
            "感動詞,*,*,*,*,*,こんにちは,コンニチハ,コンニチワ,0/5,*",
        );
        node.chain_flag = -1;
        convert(&[node])
    }

    #[test]
    fn test_phone_rendering() {
        let labels = labels();
        let joined = render(&labels, &G2pOption::default());
        assert_eq!(joined, G2pOutput::Joined("k o N n i ch i w a".to_string()));

        let symbols = render(&labels, &G2pOption { join: false, ..Default::default() });
        match symbols {
            G2pOutput::Symbols(v) => assert_eq!(v.join(" "), "k o N n i ch i w a"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_kana_rendering() {
        let labels = labels();
        let joined = render(&labels, &G2pOption { kana: true, join: true });
        assert_eq!(joined, G2pOutput::Joined("コンニチワ".to_string()));
    }

    #[test]
    fn test_empty_labels_render_empty() {
        assert_eq!(
            render(&[], &G2pOption::default()),
            G2pOutput::Joined(String::new())
        );
        assert_eq!(
            render(&[], &G2pOption { join: false, ..Default::default() }),
            G2pOutput::Symbols(vec![])
        );
    }
}
