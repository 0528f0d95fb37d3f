//! 共通の定数定義

/// 入力文の最大文字数。
///
/// ラティスのノード位置を`u16`系の添字で扱えるように上限を設けています。
pub const MAX_SENTENCE_LENGTH: usize = 0xFFFF;

/// BOS/EOSノードに割り当てる接続ID。
pub const BOS_EOS_CONNECTION_ID: u16 = 0;
