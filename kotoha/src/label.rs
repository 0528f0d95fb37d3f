//! 音素・モーララベルへの変換
//!
//! このモジュールは、書き換え済みの素性ノード列を、アクセント句境界・
//! ポーズ・モーラ単位のアクセント位置を持つ平坦な音素ラベル列へ
//! 変換します。ラベルはノード列から純粋に導出される値で、変換後に
//! 変更されることはありません。
//!
//! 句読点はアクセント句の間でのみポーズラベルになります。文頭・文末の
//! 句読点、および発音を持たないノードはラベルを生成しません。

use crate::mora::{split_moras, Mora};
use crate::node::FeatureNode;

/// ポーズの長さの区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    /// 読点相当の短いポーズ
    Short,
    /// 句点・文末記号相当の長いポーズ
    Long,
}

/// 音素1つ分（またはポーズ1つ分）のラベル
///
/// ポーズラベルは`phoneme == "pau"`で、モーラ情報を持ちません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// 音素記号。無声化した母音は大文字です。
    pub phoneme: String,
    /// モーラ先頭の音素にのみ付く、モーラのカタカナ表記
    pub mora: Option<String>,
    /// アクセント句内のモーラ位置（1始まり）
    pub mora_index: usize,
    /// アクセント句のモーラ数
    pub phrase_moras: usize,
    /// アクセント句の核位置（0は平板型）
    pub accent_pos: usize,
    /// アクセント句の最初の音素かどうか
    pub phrase_start: bool,
    /// アクセント句の最後の音素かどうか
    pub phrase_end: bool,
    /// ポーズラベルの場合、その長さ区分
    pub pause: Option<PauseKind>,
}

/// ノード列の区分け
enum Segment<'a> {
    /// アクセント句を構成するノードの並び
    Phrase(Vec<&'a FeatureNode>),
    /// 句読点によるポーズ
    Pause(PauseKind),
    /// ラベルを生成しない区切り（空白など）
    Break,
}

/// 素性ノード列をラベル列へ変換します。
pub fn convert(nodes: &[FeatureNode]) -> Vec<Label> {
    let mut segments: Vec<Segment> = vec![];
    for node in nodes {
        if node.is_symbol() {
            if node.surface.chars().all(char::is_whitespace) {
                segments.push(Segment::Break);
                continue;
            }
            let kind = pause_kind_of(node);
            match segments.last_mut() {
                Some(Segment::Pause(k)) => {
                    if kind == PauseKind::Long {
                        *k = PauseKind::Long;
                    }
                }
                _ => segments.push(Segment::Pause(kind)),
            }
        } else if node.chain_flag == 1 {
            match segments.last_mut() {
                Some(Segment::Phrase(phrase)) => phrase.push(node),
                _ => segments.push(Segment::Phrase(vec![node])),
            }
        } else {
            segments.push(Segment::Phrase(vec![node]));
        }
    }

    let mut labels = vec![];
    let mut prev_vowel: Option<&'static str> = None;
    let mut pending_pause: Option<PauseKind> = None;
    for segment in &segments {
        match segment {
            Segment::Break => {
                prev_vowel = None;
            }
            Segment::Pause(kind) => {
                prev_vowel = None;
                // A pause renders only between phrases.
                if !labels.is_empty() {
                    pending_pause = Some(match pending_pause {
                        Some(PauseKind::Long) => PauseKind::Long,
                        _ => *kind,
                    });
                }
            }
            Segment::Phrase(phrase) => {
                let mut moras: Vec<Mora> = vec![];
                for node in phrase {
                    if !node.has_pron() {
                        continue;
                    }
                    for mora in split_moras(&node.pron, prev_vowel) {
                        prev_vowel = mora.vowel();
                        moras.push(mora);
                    }
                }
                if moras.is_empty() {
                    continue;
                }
                if let Some(kind) = pending_pause.take() {
                    labels.push(pause_label(kind));
                }
                append_phrase_labels(&mut labels, &moras, phrase[0].acc);
            }
        }
    }
    labels
}

/// 1つのアクセント句のラベルを追加します。
fn append_phrase_labels(labels: &mut Vec<Label>, moras: &[Mora], accent: i32) {
    let phrase_moras = moras.len();
    let accent_pos = usize::try_from(accent).unwrap_or(0).min(phrase_moras);

    for (mi, mora) in moras.iter().enumerate() {
        let num_phonemes = mora.phonemes.len();
        for (pi, phoneme) in mora.phonemes.iter().enumerate() {
            labels.push(Label {
                phoneme: phoneme.clone(),
                mora: (pi == 0).then(|| mora.text.clone()),
                mora_index: mi + 1,
                phrase_moras,
                accent_pos,
                phrase_start: mi == 0 && pi == 0,
                phrase_end: mi + 1 == phrase_moras && pi + 1 == num_phonemes,
                pause: None,
            });
        }
    }
}

fn pause_label(kind: PauseKind) -> Label {
    Label {
        phoneme: "pau".to_string(),
        mora: None,
        mora_index: 0,
        phrase_moras: 0,
        accent_pos: 0,
        phrase_start: false,
        phrase_end: false,
        pause: Some(kind),
    }
}

/// 記号ノードのポーズ区分を判定します。
fn pause_kind_of(node: &FeatureNode) -> PauseKind {
    if node
        .surface
        .chars()
        .any(|c| matches!(c, '。' | '！' | '？' | '．' | '!' | '?' | '.'))
    {
        PauseKind::Long
    } else {
        PauseKind::Short
    }
}
