//! パイプライン全体の結合テスト
//!
//! インラインのCSVソースから辞書を構築し、テキストから音素・カナ列
//! までの変換を検証します。

use std::io::Write;

use crate::dictionary::SystemDictionaryBuilder;
use crate::errors::KotohaError;
use crate::estimator::AccentEstimator;
use crate::node::FeatureNode;
use crate::{Dictionary, G2pOption, G2pOutput, Kotoha, UserDictionary};

const LEXICON_CSV: &str = "\
こんにちは,0,0,10,感動詞,*,*,*,*,*,こんにちは,コンニチハ,コンニチワ,0/5,*
今日,0,0,10,名詞,副詞可能,*,*,*,*,今日,キョウ,キョー,1/2,*
も,0,0,10,助詞,係助詞,*,*,*,*,も,モ,モ,0/1,名詞%F2@1
です,0,0,10,助動詞,*,*,*,特殊・デス,基本形,です,デス,デス,1/2,名詞%F1
ななみん,0,0,10,名詞,固有名詞,*,*,*,*,ななみん,ナナミン,ナナミン,1/4,*
天気,0,0,10,名詞,一般,*,*,*,*,天気,テンキ,テンキ,1/3,*
雨,0,0,10,名詞,一般,*,*,*,*,雨,アメ,アメ,1/2,*
が,0,0,10,助詞,格助詞,*,*,*,*,が,ガ,ガ,0/1,名詞%F1
、,0,0,10,記号,読点,*,*,*,*,、,、,、,*,*
。,0,0,10,記号,句点,*,*,*,*,。,、,、,*,*";

const MATRIX_DEF: &str = "1 1\n0 0 0";
const UNK_DEF: &str = "DEFAULT,0,0,1000,名詞,一般,*,*,*,*,*,*,*,*,*";

const USER_CSV: &str = "GNU,0,0,1,名詞,固有名詞,*,*,*,*,GNU,グヌー,グヌー,2/3,*";

fn build_analyzer() -> Kotoha {
    let inner = SystemDictionaryBuilder::from_readers(
        LEXICON_CSV.as_bytes(),
        MATRIX_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap();
    Kotoha::new(Dictionary::from_inner(inner))
}

fn g2p_phone(analyzer: &Kotoha, text: &str) -> String {
    analyzer.g2p(text, &G2pOption::default()).into_string()
}

fn g2p_kana(analyzer: &Kotoha, text: &str) -> String {
    analyzer
        .g2p(text, &G2pOption { kana: true, join: true })
        .into_string()
}

#[test]
fn test_g2p_phone() {
    let analyzer = build_analyzer();
    assert_eq!(g2p_phone(&analyzer, "こんにちは"), "k o N n i ch i w a");
    assert_eq!(g2p_phone(&analyzer, "ななみんです"), "n a n a m i N d e s U");
}

#[test]
fn test_g2p_kana() {
    let analyzer = build_analyzer();
    assert_eq!(g2p_kana(&analyzer, "こんにちは"), "コンニチワ");
    assert_eq!(g2p_kana(&analyzer, "今日もこんにちは"), "キョーモコンニチワ");
}

#[test]
fn test_g2p_unjoined_matches_joined() {
    let analyzer = build_analyzer();
    for text in ["こんにちは", "今日もこんにちは", "雨、天気"] {
        let joined = g2p_phone(&analyzer, text);
        let symbols = analyzer.g2p(text, &G2pOption { kana: false, join: false });
        match symbols {
            G2pOutput::Symbols(v) => assert_eq!(v.join(" "), joined),
            other => panic!("unexpected output: {other:?}"),
        }
    }
}

#[test]
fn test_g2p_empty_input() {
    let analyzer = build_analyzer();
    assert_eq!(g2p_phone(&analyzer, ""), "");
    assert_eq!(
        analyzer.g2p("", &G2pOption { kana: false, join: false }),
        G2pOutput::Symbols(vec![])
    );
    assert_eq!(g2p_kana(&analyzer, ""), "");
}

#[test]
fn test_g2p_pause_between_phrases() {
    let analyzer = build_analyzer();
    assert_eq!(g2p_phone(&analyzer, "雨、天気"), "a m e pau t e N k i");
    // Trailing punctuation renders nothing.
    assert_eq!(g2p_phone(&analyzer, "雨。"), "a m e");
}

#[test]
fn test_g2p_digits() {
    let analyzer = build_analyzer();
    assert_eq!(g2p_kana(&analyzer, "123"), "ヒャクニジューサン");
    assert_eq!(g2p_phone(&analyzer, "123"), "hy a k u n i j u u s a N");
}

#[test]
fn test_run_frontend_features() {
    let analyzer = build_analyzer();
    let nodes = analyzer.run_frontend("こんにちは");
    assert_eq!(nodes.len(), 1);
    let node = &nodes[0];
    assert_eq!(node.surface, "こんにちは");
    assert_eq!(node.pos, "感動詞");
    assert_eq!(node.orig, "こんにちは");
    assert_eq!(node.read, "コンニチハ");
    assert_eq!(node.pron, "コンニチワ");
    assert_eq!(node.acc, 0);
    assert_eq!(node.mora_size, 5);
    assert_eq!(node.chain_flag, -1);
}

#[test]
fn test_run_frontend_surface_concatenation() {
    let analyzer = build_analyzer();
    for text in [
        "今日も天気です",
        "こんにちは。",
        "雨とabc123",
        "未知の言葉ばかり",
    ] {
        let nodes = analyzer.run_frontend(text);
        let surface: String = nodes.iter().map(|n| n.surface.as_str()).collect();
        assert_eq!(surface, text);
    }
}

#[test]
fn test_rewrite_is_idempotent_on_frontend_output() {
    let analyzer = build_analyzer();
    for text in ["今日もこんにちは", "ななみんです", "雨、天気。", "123"] {
        let nodes = analyzer.run_frontend(text);
        let mut again = nodes.clone();
        crate::rewrite::rewrite(&mut again);
        assert_eq!(again, nodes, "text={text}");
    }
}

#[test]
fn test_user_dictionary_changes_g2p_deterministically() {
    let analyzer = build_analyzer();

    // Unknown Latin letters carry no pronunciation.
    assert_ne!(g2p_phone(&analyzer, "GNU"), "g u n u u");
    assert!(!analyzer.has_user_dictionary());

    let user_dict = UserDictionary::from_reader(USER_CSV.as_bytes()).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    user_dict.write(&mut file).unwrap();
    file.flush().unwrap();

    analyzer.apply_user_dictionary(file.path()).unwrap();
    assert!(analyzer.has_user_dictionary());
    for _ in 0..3 {
        assert_eq!(g2p_phone(&analyzer, "GNU"), "g u n u u");
    }

    analyzer.clear_user_dictionary();
    assert!(!analyzer.has_user_dictionary());
    assert_ne!(g2p_phone(&analyzer, "GNU"), "g u n u u");
}

#[test]
fn test_user_dictionary_swap_is_atomic_for_readers() {
    let analyzer = build_analyzer();
    let user_dict = UserDictionary::from_reader(USER_CSV.as_bytes()).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    user_dict.write(&mut file).unwrap();
    file.flush().unwrap();

    let before = g2p_phone(&analyzer, "GNU");
    let after = "g u n u u".to_string();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let result = g2p_phone(&analyzer, "GNU");
                    assert!(
                        result == before || result == after,
                        "observed a torn snapshot: {result:?}"
                    );
                }
            });
        }
        analyzer.apply_user_dictionary(file.path()).unwrap();
    });

    assert_eq!(g2p_phone(&analyzer, "GNU"), after);
}

#[test]
fn test_failed_user_dictionary_load_keeps_the_active_store() {
    let analyzer = build_analyzer();
    let err = analyzer.apply_user_dictionary("/nonexistent/user.dic").unwrap_err();
    assert!(matches!(err, KotohaError::Io(_)));
    assert!(!analyzer.has_user_dictionary());
    assert_eq!(g2p_phone(&analyzer, "こんにちは"), "k o N n i ch i w a");
}

#[test]
fn test_accent_estimator_is_applied_to_labels() {
    struct FixedAccent(i32);
    impl AccentEstimator for FixedAccent {
        fn estimate(&self, nodes: &[FeatureNode]) -> Option<Vec<i32>> {
            Some(vec![self.0; nodes.len()])
        }
    }

    let analyzer = build_analyzer().with_accent_estimator(Box::new(FixedAccent(3)));
    let nodes = analyzer.run_frontend("こんにちは");
    assert_eq!(nodes[0].acc, 0);
    let labels = analyzer.make_labels(&nodes);
    assert!(labels.iter().all(|l| l.accent_pos == 3));

    // The default estimator leaves the pipeline result as is.
    let plain = build_analyzer();
    let labels = plain.make_labels(&plain.run_frontend("こんにちは"));
    assert!(labels.iter().all(|l| l.accent_pos == 0));
}

#[test]
fn test_system_dictionary_file_round_trip() {
    let inner = SystemDictionaryBuilder::from_readers(
        LEXICON_CSV.as_bytes(),
        MATRIX_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap();
    let dict = Dictionary::from_inner(inner);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    dict.write(&mut file).unwrap();
    file.flush().unwrap();

    let analyzer = Kotoha::from_path(file.path()).unwrap();
    assert_eq!(g2p_phone(&analyzer, "こんにちは"), "k o N n i ch i w a");
    assert_eq!(g2p_kana(&analyzer, "こんにちは"), "コンニチワ");
}

#[test]
fn test_malformed_lexicon_reports_the_offending_row() {
    let bad_csv = format!("{LEXICON_CSV}\n壊れた,0,0");
    let err = SystemDictionaryBuilder::from_readers(
        bad_csv.as_bytes(),
        MATRIX_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap_err();
    match err {
        KotohaError::MalformedEntry(e) => {
            assert_eq!(e.row(), 11);
            assert_eq!(e.column(), 4);
        }
        e => panic!("unexpected error: {e}"),
    }
}
