//! アクセント句連鎖判定パス
//!
//! 各ノードが前のノードと同じアクセント句に属するかどうかを決定し、
//! `chain_flag`を設定します。付属語（助詞・助動詞・接尾）は前の語へ
//! 連鎖し、自立語同士は後続語の結合規則が先行品詞への`C`規則を持つ
//! 場合にのみ連鎖します。記号は常に句を切ります。
//!
//! 判定は品詞と結合規則のみの純関数なので、再適用しても結果は
//! 変わりません。

use crate::node::FeatureNode;
use crate::rewrite::accent::matching_clause;

/// アクセント句連鎖判定パスを適用します。
pub fn apply(nodes: &mut [FeatureNode]) {
    for i in 0..nodes.len() {
        nodes[i].chain_flag = decide(nodes, i);
    }
}

/// `i`番目のノードの連鎖フラグを決定します。
fn decide(nodes: &[FeatureNode], i: usize) -> i8 {
    if i == 0 {
        // 先頭のノードには連鎖の相手がいない。
        return -1;
    }
    let node = &nodes[i];
    let prev = &nodes[i - 1];

    if node.is_symbol() || prev.is_symbol() {
        return 0;
    }

    // 折りたたまれた数字列の残り（発音なし）は先頭の数字に付く。
    if node.digit_folded && node.pron.is_empty() {
        return 1;
    }

    // 付属語は直前の語へ連鎖する。
    if node.pos == "助詞" || node.pos == "助動詞" {
        return 1;
    }
    if node.pos_group1 == "接尾" || node.pos_group1 == "非自立" {
        return 1;
    }

    // 接頭詞は後続の語と1句を成す。
    if prev.pos == "接頭詞" {
        return 1;
    }

    // 連用形に続く用言は複合述語として連鎖する。
    if matches!(node.pos.as_str(), "動詞" | "形容詞")
        && matches!(prev.pos.as_str(), "動詞" | "形容詞")
        && prev.cform.contains("連用")
    {
        return 1;
    }

    // 自立語同士は、結合規則が先行品詞へのC規則を持つ場合のみ連鎖する。
    if let Some(clause) = matching_clause(&node.chain_rule, &prev.pos) {
        if clause.kind == 'C' {
            return 1;
        }
    }

    0
}
