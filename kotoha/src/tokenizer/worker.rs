//! トークン化処理のためのルーチンを提供するモジュール
//!
//! ワーカーは文とラティスの内部バッファを保持し、再利用することで
//! 不要なメモリアロケーションを避けます。

use crate::node::FeatureNode;
use crate::sentence::Sentence;
use crate::token::{Token, TokenIter};
use crate::tokenizer::lattice::{Lattice, Node};
use crate::tokenizer::Tokenizer;

/// トークン化処理のためのルーチンを提供する構造体
///
/// # 例
///
/// ```ignore
/// let mut worker = tokenizer.new_worker();
/// worker.reset_sentence("日本語の文章");
/// worker.tokenize();
/// for token in worker.token_iter() {
///     println!("{}", token.surface());
/// }
/// ```
pub struct Worker {
    pub(crate) tokenizer: Tokenizer,
    pub(crate) sent: Sentence,
    pub(crate) lattice: Lattice,
    pub(crate) top_nodes: Vec<(usize, Node)>,
}

impl Worker {
    /// 新しいインスタンスを作成します。
    pub(crate) fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            sent: Sentence::new(),
            lattice: Lattice::default(),
            top_nodes: vec![],
        }
    }

    /// トークン化する入力文をリセットします。
    ///
    /// # 引数
    ///
    /// * `input` - トークン化する入力文字列
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.sent.clear();
        self.top_nodes.clear();
        let input = input.as_ref();
        if !input.is_empty() {
            self.sent.set_sentence(input);
            self.sent.compile();
        }
    }

    /// 設定された入力文をトークン化します。
    ///
    /// トークン化結果は内部状態に保存され、[`token_iter()`](Self::token_iter)や
    /// [`token()`](Self::token)でアクセスできます。空の文が設定されている
    /// 場合は何も行いません。
    pub fn tokenize(&mut self) {
        if self.sent.chars().is_empty() {
            return;
        }
        self.tokenizer.build_lattice(&self.sent, &mut self.lattice);
        self.lattice.append_top_nodes(&mut self.top_nodes);
    }

    /// トークン化結果のトークン数を取得します。
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.top_nodes.len()
    }

    /// `i`番目のトークンを取得します。
    ///
    /// # 引数
    ///
    /// * `i` - トークンのインデックス（0から始まり、文頭から数える）
    #[inline(always)]
    pub fn token<'w>(&'w self, i: usize) -> Token<'w> {
        let index = self.num_tokens() - i - 1;
        Token::new(self, index)
    }

    /// トークン化結果のイテレータを作成します。
    #[inline(always)]
    pub fn token_iter<'w>(&'w self) -> TokenIter<'w> {
        TokenIter::new(self)
    }

    /// トークン化結果を素性ノード列へ展開します。
    ///
    /// 各トークンの素性文字列をパースし、書き換えパイプラインへ渡せる
    /// [`FeatureNode`]の列を生成します。
    pub fn feature_nodes(&self) -> Vec<FeatureNode> {
        self.token_iter()
            .map(|t| FeatureNode::from_feature(t.surface(), t.feature()))
            .collect()
    }
}
