//! 発音解決パス
//!
//! 発音が未解決（`*`）のノードに対して、かな表層形から発音を導出します。
//! また、表記と発音が食い違う助詞（は・へ）の発音を補正し、
//! モーラ数が未設定のノードのモーラ数を発音から数え直します。
//!
//! かなでも数字でもない未知語の発音は`*`のまま残り、後段では
//! 無音として扱われます。

use crate::mora::{count_moras, hiragana_to_katakana, is_kana};
use crate::node::FeatureNode;

/// 発音解決パスを適用します。
pub fn apply(nodes: &mut [FeatureNode]) {
    for node in nodes.iter_mut() {
        // 表記と発音が異なる助詞。辞書に発音が入っていても上書きする。
        if node.pos == "助詞" {
            match node.surface.as_str() {
                "は" => node.pron = "ワ".to_string(),
                "へ" => node.pron = "エ".to_string(),
                _ => {}
            }
        }

        if node.pron == "*" && !node.is_digit() {
            let surface_is_kana = node.surface.chars().all(is_kana);
            if !node.surface.is_empty() && surface_is_kana {
                let katakana = hiragana_to_katakana(&node.surface);
                node.read = katakana.clone();
                node.pron = katakana;
            }
        }

        if node.mora_size == 0 && node.has_pron() {
            node.mora_size = count_moras(&node.pron);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kana_surface_gets_a_pronunciation() {
        let mut nodes = vec![FeatureNode::from_feature(
            "いやあん",
            "名詞,一般,*,*,*,*,*,*,*,*,*",
        )];
        apply(&mut nodes);
        assert_eq!(nodes[0].read, "イヤアン");
        assert_eq!(nodes[0].pron, "イヤアン");
        assert_eq!(nodes[0].mora_size, 4);
    }

    #[test]
    fn test_non_kana_surface_stays_unresolved() {
        let mut nodes = vec![FeatureNode::from_feature("G", "名詞,一般,*,*,*,*,*,*,*,*,*")];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "*");
        assert_eq!(nodes[0].mora_size, 0);
    }

    #[test]
    fn test_topic_particle_wa() {
        let mut nodes = vec![FeatureNode::from_feature(
            "は",
            "助詞,係助詞,*,*,*,*,は,ハ,ハ,0/1,*",
        )];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "ワ");
        assert_eq!(nodes[0].read, "ハ");
    }

    #[test]
    fn test_mora_size_is_recomputed_when_missing() {
        let mut nodes = vec![FeatureNode::from_feature(
            "こんにちは",
            "感動詞,*,*,*,*,*,こんにちは,コンニチハ,コンニチワ,*,*",
        )];
        apply(&mut nodes);
        assert_eq!(nodes[0].mora_size, 5);
    }

    #[test]
    fn test_digits_are_left_for_the_digit_pass() {
        let mut nodes = vec![FeatureNode::from_feature("7", "名詞,数,*,*,*,*,*,*,*,*,*")];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "*");
    }
}
