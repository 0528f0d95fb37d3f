//! 素性ノード列の書き換えパイプライン
//!
//! このモジュールは、トークナイザーが生成した素性ノード列に対して、
//! 固定順の書き換えパスを適用します。各パスはノード列を読み、
//! 自ノードのフィールドを埋めるだけで、ノードの挿入・削除・並べ替えは
//! 行いません。
//!
//! パスの適用順:
//!
//! 1. [`pronounce`] - 発音の解決（かな表層形の発音化、助詞の音韻補正）
//! 2. [`digits`] - 数字列の読みの折りたたみ
//! 3. [`chain`] - アクセント句の連鎖判定
//! 4. [`accent`] - アクセント句ごとのアクセント核位置の解決
//! 5. [`devoice`] - 母音の無声化
//! 6. [`long_vowel`] - 連続する同一母音の長音化
//!
//! すべてのパスは冪等です。処理済みのノード列へ再適用しても結果は
//! 変わりません。外部のアクセント推定器がアクセント型を差し替えた後、
//! アクセント依存の変換だけをやり直せるのはこの性質によります。

pub mod accent;
pub mod chain;
pub mod devoice;
pub mod digits;
pub mod long_vowel;
pub mod pronounce;

use crate::node::FeatureNode;

/// 書き換えパイプラインを固定順で適用します。
pub fn rewrite(nodes: &mut [FeatureNode]) {
    pronounce::apply(nodes);
    digits::apply(nodes);
    chain::apply(nodes);
    accent::apply(nodes);
    devoice::apply(nodes);
    long_vowel::apply(nodes);
}
