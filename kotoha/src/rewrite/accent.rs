//! アクセント核解決パス
//!
//! アクセント句ごとに構成ノードを先頭から走査し、各ノードの
//! アクセント結合規則を適用してアクセント句全体の核位置を求めます。
//! 解決した核位置は句頭ノードの`acc`に格納します。
//!
//! # 結合規則の書式
//!
//! 規則は`/`区切りの節のリストで、各節は`品詞%規則@数値`の形です。
//! 品詞部は省略でき、省略した節はどの先行品詞にも一致します。
//! 数値部も省略でき、既定値は`1`です。例:
//!
//! ```text
//! 形容詞%F2@-1/動詞%F2@0/名詞%F1
//! ```
//!
//! 規則の意味（`m` = 句内でこのノードより前のモーラ数合計、
//! `own` = このノード単独のアクセント型、`@n` = 数値部）:
//!
//! | 規則 | 動作 |
//! |------|------|
//! | C1   | 核を `m + own` へ（`own`が0なら平板のまま） |
//! | C2   | 核を `m + 1` へ |
//! | C3   | 核を `m` へ |
//! | C4   | 平板化（核なし） |
//! | C5   | 変化なし |
//! | F1   | 変化なし |
//! | F2   | 句がまだ平板なら核を `m + n` へ |
//! | F3   | 句に核があるなら核を `m + n` へ |
//! | F4   | 核を `m + n` へ |
//! | F5   | 平板化 |
//! | F6   | F2と同じ（平板の句にのみ核を与える） |
//! | P1   | 変化なし |
//! | P2   | 句がまだ平板なら核を `m + 1` へ |
//! | P6   | 平板化 |
//! | P14  | 変化なし |
//!
//! 未知の規則や一致する節がない場合は変化なしに落とします。
//! このパスが失敗することはありません。

use crate::node::FeatureNode;

/// パース済みの結合規則の節
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleClause {
    /// 規則の種別（`C`、`F`、`P`）
    pub kind: char,
    /// 規則番号
    pub num: u32,
    /// `@`に続く数値。省略時は`1`
    pub shift: i32,
}

/// 結合規則から、先行ノードの品詞に一致する最初の節を探します。
pub(crate) fn matching_clause(rule: &str, prev_pos: &str) -> Option<RuleClause> {
    if rule == "*" || rule.is_empty() || rule == "-1" {
        return None;
    }
    for clause in rule.split('/') {
        let (pos_filter, body) = match clause.split_once('%') {
            Some((pos, body)) => (Some(pos), body),
            None => (None, clause),
        };
        if let Some(pos_filter) = pos_filter {
            if !prev_pos.starts_with(pos_filter) {
                continue;
            }
        }
        if let Some(parsed) = parse_clause_body(body) {
            return Some(parsed);
        }
    }
    None
}

fn parse_clause_body(body: &str) -> Option<RuleClause> {
    let (mnemonic, shift) = match body.split_once('@') {
        Some((mnemonic, shift)) => (mnemonic, shift.parse().ok()?),
        None => (body, 1),
    };
    let mut chars = mnemonic.chars();
    let kind = chars.next()?;
    if !matches!(kind, 'C' | 'F' | 'P') {
        return None;
    }
    let num: u32 = chars.as_str().parse().ok()?;
    Some(RuleClause { kind, num, shift })
}

/// アクセント核解決パスを適用します。
pub fn apply(nodes: &mut [FeatureNode]) {
    let mut i = 0;
    while i < nodes.len() {
        let mut j = i + 1;
        while j < nodes.len() && nodes[j].chain_flag == 1 {
            j += 1;
        }
        resolve_phrase(&mut nodes[i..j]);
        i = j;
    }
}

/// 1つのアクセント句の核位置を解決します。
fn resolve_phrase(phrase: &mut [FeatureNode]) {
    if phrase[0].is_symbol() {
        return;
    }

    let mut phrase_acc = phrase[0].acc;
    let mut moras = phrase[0].mora_size;

    for k in 1..phrase.len() {
        let prev_pos = phrase[k - 1].pos.clone();
        let member = &phrase[k];
        let own_acc = member.acc;
        let m = i32::try_from(moras).unwrap_or(i32::MAX);

        if let Some(clause) = matching_clause(&member.chain_rule, &prev_pos) {
            match (clause.kind, clause.num) {
                ('C', 1) => phrase_acc = if own_acc == 0 { 0 } else { m + own_acc },
                ('C', 2) => phrase_acc = m + 1,
                ('C', 3) => phrase_acc = m,
                ('C', 4) => phrase_acc = 0,
                ('C', 5) => {}
                ('F', 1) => {}
                ('F', 2) | ('F', 6) => {
                    if phrase_acc == 0 {
                        phrase_acc = m + clause.shift;
                    }
                }
                ('F', 3) => {
                    if phrase_acc != 0 {
                        phrase_acc = m + clause.shift;
                    }
                }
                ('F', 4) => phrase_acc = m + clause.shift,
                ('F', 5) => phrase_acc = 0,
                ('P', 2) => {
                    if phrase_acc == 0 {
                        phrase_acc = m + 1;
                    }
                }
                ('P', 6) => phrase_acc = 0,
                // Unknown combinations fall back to no change.
                _ => {}
            }
        }

        moras += member.mora_size;
    }

    phrase[0].acc = phrase_acc.clamp(0, i32::try_from(moras).unwrap_or(i32::MAX));
}
