//! 母音無声化パス
//!
//! 無声子音に挟まれた狭母音（イ・ウ）と、句末の「です」「ます」の
//! 末尾のスを無声化し、発音文字列のモーラ直後に`’`の印を付けます。
//! 音素化の際、印の付いたモーラの母音は大文字（`U`など）になります。
//!
//! 無声化しないケース:
//!
//! - アクセント核のモーラ
//! - 直前のモーラがすでに無声化しているとき（無声化は連続しない）

use crate::mora::{split_moras, Mora, DEVOICE_MARK};
use crate::node::FeatureNode;

/// 母音無声化パスを適用します。
pub fn apply(nodes: &mut [FeatureNode]) {
    let mut i = 0;
    while i < nodes.len() {
        let mut j = i + 1;
        while j < nodes.len() && nodes[j].chain_flag == 1 {
            j += 1;
        }
        devoice_phrase(&mut nodes[i..j]);
        i = j;
    }
}

/// 1つのアクセント句に無声化の印を付けます。
fn devoice_phrase(phrase: &mut [FeatureNode]) {
    if phrase[0].is_symbol() {
        return;
    }
    let accent = phrase[0].acc;

    // Split every member into moras, remembering the owning node.
    let mut moras: Vec<(usize, Mora)> = vec![];
    for (k, node) in phrase.iter().enumerate() {
        if !node.has_pron() {
            continue;
        }
        for m in split_moras(&node.pron, None) {
            moras.push((k, m));
        }
    }

    let num_moras = moras.len();
    let mut marked = vec![false; num_moras];
    let mut prev_devoiced = false;
    for m in 0..num_moras {
        let (owner, mora) = &moras[m];
        if mora.devoiced {
            prev_devoiced = true;
            continue;
        }
        let is_nucleus = accent == i32::try_from(m + 1).unwrap_or(i32::MAX);
        if is_nucleus || prev_devoiced {
            prev_devoiced = false;
            continue;
        }

        let closable = mora.has_voiceless_onset() && matches!(mora.vowel(), Some("i") | Some("u"));
        let next_is_voiceless = moras
            .get(m + 1)
            .map(|(_, next)| next.has_voiceless_onset())
            .unwrap_or(false);
        let phrase_final_desu_masu = m + 1 == num_moras
            && mora.text == "ス"
            && phrase[*owner].pos == "助動詞"
            && (phrase[*owner].pron.ends_with("デス") || phrase[*owner].pron.ends_with("マス"));

        if closable && (next_is_voiceless || phrase_final_desu_masu) {
            marked[m] = true;
            prev_devoiced = true;
        } else {
            prev_devoiced = false;
        }
    }

    if !marked.iter().any(|&b| b) {
        return;
    }

    // Rebuild the pronunciation strings with the new marks.
    for (k, node) in phrase.iter_mut().enumerate() {
        if !node.has_pron() {
            continue;
        }
        let mut out = String::new();
        for (m, (owner, mora)) in moras.iter().enumerate() {
            if *owner != k {
                continue;
            }
            out.push_str(&mora.text);
            if mora.devoiced || marked[m] {
                out.push(DEVOICE_MARK);
            }
        }
        node.pron = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase_node(surface: &str, feature: &str, chain_flag: i8) -> FeatureNode {
        let mut n = FeatureNode::from_feature(surface, feature);
        n.chain_flag = chain_flag;
        n
    }

    #[test]
    fn test_phrase_final_desu() {
        let mut nodes = vec![
            phrase_node("ななみん", "名詞,固有名詞,*,*,*,*,ななみん,ナナミン,ナナミン,1/4,*", -1),
            phrase_node("です", "助動詞,*,*,*,特殊・デス,基本形,です,デス,デス,1/2,名詞%F1", 1),
        ];
        nodes[0].acc = 1;
        apply(&mut nodes);
        assert_eq!(nodes[1].pron, "デス’");
    }

    #[test]
    fn test_close_vowel_between_voiceless_onsets() {
        let mut nodes = vec![phrase_node(
            "つかいかた",
            "名詞,一般,*,*,*,*,つかいかた,ツカイカタ,ツカイカタ,0/5,*",
            -1,
        )];
        apply(&mut nodes);
        // ツ(ts u) precedes カ(k a): the u devoices.
        assert_eq!(nodes[0].pron, "ツ’カイカタ");
    }

    #[test]
    fn test_nucleus_is_never_devoiced() {
        let mut nodes = vec![phrase_node(
            "つき",
            "名詞,一般,*,*,*,*,つき,ツキ,ツキ,1/2,*",
            -1,
        )];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "ツキ");
    }

    #[test]
    fn test_no_consecutive_devoicing() {
        // ススキ: the first ス devoices before the voiceless ス, which must
        // then stay voiced even though キ follows.
        let mut nodes = vec![phrase_node(
            "すすき",
            "名詞,一般,*,*,*,*,すすき,ススキ,ススキ,0/3,*",
            -1,
        )];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "ス’スキ");
    }

    #[test]
    fn test_idempotent() {
        let mut nodes = vec![
            phrase_node("ななみん", "名詞,固有名詞,*,*,*,*,ななみん,ナナミン,ナナミン,1/4,*", -1),
            phrase_node("です", "助動詞,*,*,*,特殊・デス,基本形,です,デス,デス,1/2,名詞%F1", 1),
        ];
        apply(&mut nodes);
        let once = nodes.clone();
        apply(&mut nodes);
        assert_eq!(nodes, once);
    }
}
