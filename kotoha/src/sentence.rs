//! 入力テキストの内部表現を提供するモジュール
//!
//! このモジュールは、入力文字列を文字単位に分割し、文字位置から
//! バイト位置へのマッピングを保持します。ラティスは文字位置で
//! 構築されるため、トークンの表層形はこのマッピングで復元します。

/// 入力テキストの内部表現を保持する構造体
#[derive(Default, Clone, Debug)]
pub struct Sentence {
    input: String,
    chars: Vec<char>,
    c2b: Vec<usize>,
}

impl Sentence {
    /// 新しい空の`Sentence`インスタンスを生成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 内部状態をクリアします。
    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.chars.clear();
        self.c2b.clear();
    }

    /// 入力文字列を設定します。
    ///
    /// この時点では解析は行われません。[`compile`](Self::compile)を
    /// 呼び出すと文字配列とバイト位置マッピングが構築されます。
    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());
    }

    /// 入力文字列を解析し、内部データ構造を構築します。
    pub fn compile(&mut self) {
        for (bi, ch) in self.input.char_indices() {
            self.chars.push(ch);
            self.c2b.push(bi);
        }
        self.c2b.push(self.input.len());
    }

    /// 元の入力文字列への参照を返します。
    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    /// 文字配列への参照を返します。
    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// 文字数を返します。
    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.chars.len()
    }

    /// 指定された文字位置に対応するバイト位置を返します。
    #[inline(always)]
    pub fn byte_position(&self, pos_char: usize) -> usize {
        self.c2b[pos_char]
    }
}
