//! 長音化パス
//!
//! 直前のモーラと同じ母音の単独母音モーラ（ア・イ・ウ・エ・オ）を
//! 長音符ーへ置き換えます（イヤアン → イヤーン）。母音の連続は
//! ノード境界をまたいでも長音化しますが、記号を挟むとリセットします。
//!
//! すでに長音符になったモーラは単独母音ではないため、再適用しても
//! 変化しません。

use crate::mora::{split_moras, DEVOICE_MARK};
use crate::node::FeatureNode;

/// 長音化パスを適用します。
pub fn apply(nodes: &mut [FeatureNode]) {
    let mut prev_vowel: Option<&'static str> = None;
    for node in nodes.iter_mut() {
        if node.is_symbol() {
            prev_vowel = None;
            continue;
        }
        if !node.has_pron() {
            continue;
        }

        let moras = split_moras(&node.pron, prev_vowel);
        let mut out = String::new();
        let mut changed = false;
        for mora in &moras {
            let is_bare_vowel =
                mora.text != "ー" && mora.phonemes.len() == 1 && mora.vowel().is_some();
            if is_bare_vowel && !mora.devoiced && prev_vowel == mora.vowel() {
                out.push('ー');
                changed = true;
            } else {
                out.push_str(&mora.text);
                if mora.devoiced {
                    out.push(DEVOICE_MARK);
                }
            }
            prev_vowel = mora.vowel();
        }
        if changed {
            node.pron = out;
        }
    }
}
