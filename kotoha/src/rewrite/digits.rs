//! 数字列の読み折りたたみパス
//!
//! 連続する数字ノードの並びを1つの数として読み、先頭ノードに
//! まとまった読み（十・百・千・万・億・兆によるグループ化読み）を
//! 割り当てます。パスはノードを挿入・削除できないため、並びの残りの
//! ノードは発音なし（モーラ数0）に落とします。
//!
//! 先頭が0の並び（`007`など）と16桁を超える並びは桁ごとの読み
//! （ゼロゼロナナ）になります。

use crate::mora::count_moras;
use crate::node::FeatureNode;

/// 数字読みパスを適用します。
pub fn apply(nodes: &mut [FeatureNode]) {
    let mut i = 0;
    while i < nodes.len() {
        if !nodes[i].is_digit() || nodes[i].digit_folded {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < nodes.len() && nodes[j].is_digit() && !nodes[j].digit_folded {
            j += 1;
        }

        let digits: String = nodes[i..j]
            .iter()
            .flat_map(|n| n.surface.chars())
            .map(normalize_digit)
            .collect();
        let reading = read_number(&digits);

        for k in i..j {
            let node = &mut nodes[k];
            node.digit_folded = true;
            node.pos = "名詞".to_string();
            node.pos_group1 = "数".to_string();
            if k == i {
                node.read = reading.clone();
                node.pron = reading.clone();
                node.mora_size = count_moras(&reading);
                node.acc = 0;
            } else {
                node.read.clear();
                node.pron.clear();
                node.mora_size = 0;
                node.acc = 0;
            }
        }
        i = j;
    }
}

/// 全角数字をASCII数字へ正規化します。
fn normalize_digit(c: char) -> char {
    if ('０'..='９').contains(&c) {
        char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c)
    } else {
        c
    }
}

const DIGIT_READINGS: [&str; 10] = [
    "ゼロ", "イチ", "ニ", "サン", "ヨン", "ゴ", "ロク", "ナナ", "ハチ", "キュウ",
];

const GROUP_UNITS: [&str; 4] = ["", "マン", "オク", "チョウ"];

/// 数字列を読みへ変換します。
///
/// # 引数
///
/// * `digits` - ASCII数字のみからなる文字列
fn read_number(digits: &str) -> String {
    debug_assert!(digits.chars().all(|c| c.is_ascii_digit()));

    // Leading zeros and oversized runs read digit by digit.
    if digits.len() > 16 || (digits.len() > 1 && digits.starts_with('0')) {
        return digits
            .chars()
            .map(|c| DIGIT_READINGS[c.to_digit(10).unwrap_or(0) as usize])
            .collect();
    }
    if digits == "0" {
        return DIGIT_READINGS[0].to_string();
    }

    // Split into groups of four digits from the right.
    let chars: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    let mut groups: Vec<u32> = vec![];
    let mut idx = chars.len();
    while idx > 0 {
        let lo = idx.saturating_sub(4);
        let group = chars[lo..idx].iter().fold(0, |acc, d| acc * 10 + d);
        groups.push(group);
        idx = lo;
    }

    let mut out = String::new();
    let top = groups.len() - 1;
    for (level, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut reading = read_group(group, level == top);
        // 1兆はイッチョウ、8兆はハッチョウと促音化する。
        if GROUP_UNITS[level] == "チョウ" {
            if let Some(stem) = reading.strip_suffix("イチ") {
                reading = format!("{stem}イッ");
            } else if let Some(stem) = reading.strip_suffix("ハチ") {
                reading = format!("{stem}ハッ");
            }
        }
        out.push_str(&reading);
        out.push_str(GROUP_UNITS[level]);
    }
    out
}

/// 1〜9999をグループ内の読みへ変換します。
///
/// # 引数
///
/// * `group` - 変換する値
/// * `leading` - 数全体の最上位グループかどうか。`1000`は単独では
///   `セン`、上位グループが続く位置では`イッセン`と読みます。
fn read_group(group: u32, leading: bool) -> String {
    debug_assert!((1..=9999).contains(&group));

    let mut out = String::new();
    let thousands = group / 1000;
    let hundreds = group / 100 % 10;
    let tens = group / 10 % 10;
    let ones = group % 10;

    match thousands {
        0 => {}
        1 if leading => out.push_str("セン"),
        1 => out.push_str("イッセン"),
        3 => out.push_str("サンゼン"),
        8 => out.push_str("ハッセン"),
        d => {
            out.push_str(DIGIT_READINGS[d as usize]);
            out.push_str("セン");
        }
    }
    match hundreds {
        0 => {}
        1 => out.push_str("ヒャク"),
        3 => out.push_str("サンビャク"),
        6 => out.push_str("ロッピャク"),
        8 => out.push_str("ハッピャク"),
        d => {
            out.push_str(DIGIT_READINGS[d as usize]);
            out.push_str("ヒャク");
        }
    }
    match tens {
        0 => {}
        1 => out.push_str("ジュウ"),
        d => {
            out.push_str(DIGIT_READINGS[d as usize]);
            out.push_str("ジュウ");
        }
    }
    if ones != 0 {
        out.push_str(DIGIT_READINGS[ones as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit_node(surface: &str) -> FeatureNode {
        FeatureNode::from_feature(surface, "名詞,数,*,*,*,*,*,*,*,*,*")
    }

    #[test]
    fn test_read_number() {
        assert_eq!(read_number("0"), "ゼロ");
        assert_eq!(read_number("7"), "ナナ");
        assert_eq!(read_number("10"), "ジュウ");
        assert_eq!(read_number("123"), "ヒャクニジュウサン");
        assert_eq!(read_number("300"), "サンビャク");
        assert_eq!(read_number("600"), "ロッピャク");
        assert_eq!(read_number("800"), "ハッピャク");
        assert_eq!(read_number("3000"), "サンゼン");
        assert_eq!(read_number("8000"), "ハッセン");
        assert_eq!(read_number("1000"), "セン");
        assert_eq!(read_number("11000"), "イチマンイッセン");
        assert_eq!(read_number("20001"), "ニマンイチ");
        assert_eq!(read_number("100000000"), "イチオク");
        assert_eq!(read_number("1000000000000"), "イッチョウ");
    }

    #[test]
    fn test_leading_zeros_read_digit_by_digit() {
        assert_eq!(read_number("007"), "ゼロゼロナナ");
        assert_eq!(read_number("00"), "ゼロゼロ");
    }

    #[test]
    fn test_digit_run_is_folded_into_the_first_node() {
        let mut nodes = vec![digit_node("1"), digit_node("2"), digit_node("3")];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "ヒャクニジュウサン");
        assert_eq!(nodes[0].mora_size, 8);
        assert_eq!(nodes[1].pron, "");
        assert_eq!(nodes[1].mora_size, 0);
        assert_eq!(nodes[2].pron, "");

        // Idempotent: a second run leaves the folded run untouched.
        let once = nodes.clone();
        apply(&mut nodes);
        assert_eq!(nodes, once);
    }

    #[test]
    fn test_fullwidth_digits() {
        let mut nodes = vec![digit_node("１"), digit_node("０")];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "ジュウ");
    }

    #[test]
    fn test_separate_runs_are_read_separately() {
        let mut nodes = vec![
            digit_node("1"),
            FeatureNode::from_feature("と", "助詞,並立助詞,*,*,*,*,と,ト,ト,0/1,*"),
            digit_node("2"),
        ];
        apply(&mut nodes);
        assert_eq!(nodes[0].pron, "イチ");
        assert_eq!(nodes[2].pron, "ニ");
    }
}
