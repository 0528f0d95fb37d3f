//! モーラと音素記号の変換
//!
//! このモジュールは、カタカナ発音文字列をモーラ列に分割し、各モーラを
//! ASCII音素記号（`k o N n i ch i w a`のような表記）へ写像します。
//!
//! モーラは「カタカナ1文字＋後続の小書き文字」を基本単位とし、促音ッ
//! （`cl`）、撥音ン（`N`）、長音ー（直前の母音の繰り返し）を1モーラと
//! して扱います。モーラ直後の`’`は無声化の印で、母音の音素を大文字に
//! して表現します（例: デス’ → `d e s U`）。

/// 発音文字列から切り出した1モーラ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mora {
    /// モーラのカタカナ表記（無声化の印は含まない）
    pub text: String,
    /// 音素記号列。無声化した母音は大文字になります。
    pub phonemes: Vec<String>,
    /// 無声化しているかどうか
    pub devoiced: bool,
}

impl Mora {
    /// このモーラの母音（小文字）を返します。
    ///
    /// 撥音・促音には母音がないため`None`です。
    pub fn vowel(&self) -> Option<&'static str> {
        match self.phonemes.last().map(String::as_str) {
            Some("a") | Some("A") => Some("a"),
            Some("i") | Some("I") => Some("i"),
            Some("u") | Some("U") => Some("u"),
            Some("e") | Some("E") => Some("e"),
            Some("o") | Some("O") => Some("o"),
            _ => None,
        }
    }

    /// 頭子音が無声子音かどうかを返します。促音も無声として扱います。
    pub fn has_voiceless_onset(&self) -> bool {
        matches!(
            self.phonemes.first().map(String::as_str),
            Some("k") | Some("ky") | Some("s") | Some("sh") | Some("t") | Some("ts")
                | Some("ch") | Some("h") | Some("hy") | Some("f") | Some("p") | Some("py")
                | Some("cl")
        )
    }
}

/// カタカナ発音文字列をモーラ列へ分割します。
///
/// # 引数
///
/// * `pron` - カタカナ発音文字列（`’`による無声化の印を含んでよい）
/// * `prev_vowel` - 直前のモーラの母音。文字列先頭の長音ーの解決に
///   使用します。解決できない長音は読み飛ばします。
///
/// 音素表にない文字は読み飛ばします。`*`や空文字列は空のモーラ列に
/// なります。
pub fn split_moras(pron: &str, prev_vowel: Option<&'static str>) -> Vec<Mora> {
    let chars: Vec<char> = pron.chars().collect();
    let mut moras = vec![];
    let mut prev_vowel = prev_vowel;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == DEVOICE_MARK {
            // A stray mark carries no mora.
            i += 1;
            continue;
        }

        let mora = if c == 'ー' {
            i += 1;
            let Some(v) = prev_vowel else {
                continue;
            };
            Some(Mora {
                text: "ー".to_string(),
                phonemes: vec![v.to_string()],
                devoiced: false,
            })
        } else {
            let mut consumed = 0;
            let mut found = None;
            if i + 1 < chars.len() && is_small_kana(chars[i + 1]) {
                let two: String = chars[i..i + 2].iter().collect();
                if let Some(p) = phones_of(&two) {
                    found = Some((two, p));
                    consumed = 2;
                }
            }
            if found.is_none() {
                let one: String = c.to_string();
                if let Some(p) = phones_of(&one) {
                    found = Some((one, p));
                    consumed = 1;
                }
            }
            if found.is_none() {
                // Unmapped character, e.g. `*` of an unresolved pronunciation.
                i += 1;
                continue;
            }
            let (text, phones) = found.unwrap();
            i += consumed;
            Some(Mora {
                text,
                phonemes: phones.iter().map(|p| p.to_string()).collect(),
                devoiced: false,
            })
        };

        let Some(mut mora) = mora else { continue };
        if i < chars.len() && chars[i] == DEVOICE_MARK {
            i += 1;
            mora.devoiced = true;
            if let Some(last) = mora.phonemes.last_mut() {
                *last = last.to_uppercase();
            }
        }
        prev_vowel = mora.vowel();
        moras.push(mora);
    }
    moras
}

/// 発音文字列のモーラ数を数えます。
///
/// 文字列先頭の長音ーも1モーラとして数えます。
pub fn count_moras(pron: &str) -> usize {
    split_moras(pron, Some("a")).len()
}

/// 無声化の印。
pub const DEVOICE_MARK: char = '’';

/// 小書き文字（先行する文字と結合して1モーラを構成しうる文字）か
/// どうかを判定します。
fn is_small_kana(c: char) -> bool {
    matches!(c, 'ャ' | 'ュ' | 'ョ' | 'ァ' | 'ィ' | 'ゥ' | 'ェ' | 'ォ')
}

/// ひらがな・カタカナ・長音符かどうかを判定します。
pub(crate) fn is_kana(c: char) -> bool {
    matches!(c, 'ぁ'..='ゖ' | 'ァ'..='ヶ' | 'ー' | 'ヴ')
}

/// ひらがなをカタカナへ変換します。その他の文字はそのまま返します。
pub(crate) fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('ぁ'..='ゖ').contains(&c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// カタカナのモーラ表記を音素記号列へ写像します。
fn phones_of(kana: &str) -> Option<&'static [&'static str]> {
    let phones: &'static [&'static str] = match kana {
        // 拗音
        "キャ" => &["ky", "a"],
        "キュ" => &["ky", "u"],
        "キェ" => &["ky", "e"],
        "キョ" => &["ky", "o"],
        "ギャ" => &["gy", "a"],
        "ギュ" => &["gy", "u"],
        "ギェ" => &["gy", "e"],
        "ギョ" => &["gy", "o"],
        "シャ" => &["sh", "a"],
        "シュ" => &["sh", "u"],
        "シェ" => &["sh", "e"],
        "ショ" => &["sh", "o"],
        "ジャ" => &["j", "a"],
        "ジュ" => &["j", "u"],
        "ジェ" => &["j", "e"],
        "ジョ" => &["j", "o"],
        "チャ" => &["ch", "a"],
        "チュ" => &["ch", "u"],
        "チェ" => &["ch", "e"],
        "チョ" => &["ch", "o"],
        "ニャ" => &["ny", "a"],
        "ニュ" => &["ny", "u"],
        "ニェ" => &["ny", "e"],
        "ニョ" => &["ny", "o"],
        "ヒャ" => &["hy", "a"],
        "ヒュ" => &["hy", "u"],
        "ヒェ" => &["hy", "e"],
        "ヒョ" => &["hy", "o"],
        "ビャ" => &["by", "a"],
        "ビュ" => &["by", "u"],
        "ビョ" => &["by", "o"],
        "ピャ" => &["py", "a"],
        "ピュ" => &["py", "u"],
        "ピョ" => &["py", "o"],
        "ミャ" => &["my", "a"],
        "ミュ" => &["my", "u"],
        "ミョ" => &["my", "o"],
        "リャ" => &["ry", "a"],
        "リュ" => &["ry", "u"],
        "リョ" => &["ry", "o"],
        // 外来音
        "イェ" => &["y", "e"],
        "ウィ" => &["w", "i"],
        "ウェ" => &["w", "e"],
        "ウォ" => &["w", "o"],
        "ツァ" => &["ts", "a"],
        "ツィ" => &["ts", "i"],
        "ツェ" => &["ts", "e"],
        "ツォ" => &["ts", "o"],
        "ティ" => &["t", "i"],
        "テュ" => &["ty", "u"],
        "トゥ" => &["t", "u"],
        "ディ" => &["d", "i"],
        "デュ" => &["dy", "u"],
        "ドゥ" => &["d", "u"],
        "ファ" => &["f", "a"],
        "フィ" => &["f", "i"],
        "フェ" => &["f", "e"],
        "フォ" => &["f", "o"],
        "ヴァ" => &["b", "a"],
        "ヴィ" => &["b", "i"],
        "ヴェ" => &["b", "e"],
        "ヴォ" => &["b", "o"],
        // 直音
        "ア" | "ァ" => &["a"],
        "イ" | "ィ" | "ヰ" => &["i"],
        "ウ" | "ゥ" => &["u"],
        "エ" | "ェ" | "ヱ" => &["e"],
        "オ" | "ォ" | "ヲ" => &["o"],
        "カ" => &["k", "a"],
        "キ" => &["k", "i"],
        "ク" => &["k", "u"],
        "ケ" => &["k", "e"],
        "コ" => &["k", "o"],
        "ガ" => &["g", "a"],
        "ギ" => &["g", "i"],
        "グ" => &["g", "u"],
        "ゲ" => &["g", "e"],
        "ゴ" => &["g", "o"],
        "サ" => &["s", "a"],
        "シ" => &["sh", "i"],
        "ス" => &["s", "u"],
        "セ" => &["s", "e"],
        "ソ" => &["s", "o"],
        "ザ" => &["z", "a"],
        "ジ" | "ヂ" => &["j", "i"],
        "ズ" | "ヅ" => &["z", "u"],
        "ゼ" => &["z", "e"],
        "ゾ" => &["z", "o"],
        "タ" => &["t", "a"],
        "チ" => &["ch", "i"],
        "ツ" => &["ts", "u"],
        "テ" => &["t", "e"],
        "ト" => &["t", "o"],
        "ダ" => &["d", "a"],
        "デ" => &["d", "e"],
        "ド" => &["d", "o"],
        "ナ" => &["n", "a"],
        "ニ" => &["n", "i"],
        "ヌ" => &["n", "u"],
        "ネ" => &["n", "e"],
        "ノ" => &["n", "o"],
        "ハ" => &["h", "a"],
        "ヒ" => &["h", "i"],
        "フ" => &["f", "u"],
        "ヘ" => &["h", "e"],
        "ホ" => &["h", "o"],
        "バ" => &["b", "a"],
        "ビ" => &["b", "i"],
        "ブ" => &["b", "u"],
        "ベ" => &["b", "e"],
        "ボ" => &["b", "o"],
        "パ" => &["p", "a"],
        "ピ" => &["p", "i"],
        "プ" => &["p", "u"],
        "ペ" => &["p", "e"],
        "ポ" => &["p", "o"],
        "マ" => &["m", "a"],
        "ミ" => &["m", "i"],
        "ム" => &["m", "u"],
        "メ" => &["m", "e"],
        "モ" => &["m", "o"],
        "ヤ" | "ャ" => &["y", "a"],
        "ユ" | "ュ" => &["y", "u"],
        "ヨ" | "ョ" => &["y", "o"],
        "ラ" => &["r", "a"],
        "リ" => &["r", "i"],
        "ル" => &["r", "u"],
        "レ" => &["r", "e"],
        "ロ" => &["r", "o"],
        "ワ" => &["w", "a"],
        "ヴ" => &["b", "u"],
        "ン" => &["N"],
        "ッ" => &["cl"],
        _ => return None,
    };
    Some(phones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones(pron: &str) -> Vec<String> {
        split_moras(pron, None)
            .into_iter()
            .flat_map(|m| m.phonemes)
            .collect()
    }

    #[test]
    fn test_split_simple() {
        assert_eq!(phones("コンニチワ"), ["k", "o", "N", "n", "i", "ch", "i", "w", "a"]);
    }

    #[test]
    fn test_split_digraphs() {
        assert_eq!(phones("キョー"), ["ky", "o", "o"]);
        assert_eq!(phones("シッテ"), ["sh", "i", "cl", "t", "e"]);
        assert_eq!(phones("ファイル"), ["f", "a", "i", "r", "u"]);
    }

    #[test]
    fn test_devoice_mark_uppercases_the_vowel() {
        assert_eq!(phones("デス’"), ["d", "e", "s", "U"]);
        let moras = split_moras("デス’", None);
        assert_eq!(moras.len(), 2);
        assert!(moras[1].devoiced);
        assert_eq!(moras[1].text, "ス");
        assert_eq!(moras[1].vowel(), Some("u"));
    }

    #[test]
    fn test_long_vowel_repeats_the_previous_vowel() {
        assert_eq!(phones("イヤーン"), ["i", "y", "a", "a", "N"]);
        // The leading prolonged sound mark takes the vowel from the caller.
        let moras = split_moras("ーン", Some("o"));
        assert_eq!(moras[0].phonemes, ["o"]);
        // Unresolvable marks are skipped.
        assert_eq!(phones("ーン"), ["N"]);
    }

    #[test]
    fn test_unmapped_characters_are_skipped() {
        assert!(phones("*").is_empty());
        assert!(phones("").is_empty());
    }

    #[test]
    fn test_count_moras() {
        assert_eq!(count_moras("コンニチワ"), 5);
        assert_eq!(count_moras("キョー"), 2);
        assert_eq!(count_moras("グヌー"), 3);
        assert_eq!(count_moras("*"), 0);
    }

    #[test]
    fn test_voiceless_onset() {
        let moras = split_moras("スキダ", None);
        assert!(moras[0].has_voiceless_onset());
        assert!(moras[1].has_voiceless_onset());
        assert!(!moras[2].has_voiceless_onset());
    }

    #[test]
    fn test_hiragana_to_katakana() {
        assert_eq!(hiragana_to_katakana("こんにちは"), "コンニチハ");
        assert_eq!(hiragana_to_katakana("イヤーん"), "イヤーン");
    }
}
