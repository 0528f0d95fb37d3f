//! 最小コスト経路探索に基づくトークナイザー
//!
//! このモジュールは、入力テキストを辞書の表層形で被覆する最小コストの
//! トークン列に分割するトークナイザーを提供します。
//!
//! # 主要な構造体
//!
//! - [`Tokenizer`]: 辞書を保持するトークナイザー本体
//! - [`Worker`](crate::tokenizer::worker::Worker): 実際の解析処理を行うワーカー
//!
//! # 例
//!
//! ```no_run
//! use kotoha::{Dictionary, Tokenizer};
//!
//! let dict = Dictionary::from_path("path/to/system.dic")?;
//! let tokenizer = Tokenizer::new(dict);
//! let mut worker = tokenizer.new_worker();
//!
//! worker.reset_sentence("自然言語処理");
//! worker.tokenize();
//!
//! for token in worker.token_iter() {
//!     println!("{}", token.surface());
//! }
//! # Ok::<(), kotoha::errors::KotohaError>(())
//! ```
pub(crate) mod lattice;
pub mod worker;

use std::sync::Arc;

use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::word_idx::WordIdx;
use crate::dictionary::{Dictionary, LexType, UserDictionary};
use crate::errors::{KotohaError, Result};
use crate::sentence::Sentence;
use crate::tokenizer::lattice::Lattice;
use crate::tokenizer::worker::Worker;

/// トークン化を行うトークナイザー
///
/// システム辞書と、適用中であればユーザー辞書の語彙を保持します。
/// 内部データは`Arc`で共有されるため、クローンは安価です。
/// 解析中のスナップショットとしてそのまま受け渡しできます。
#[derive(Clone)]
pub struct Tokenizer {
    dict: Dictionary,
    user_lexicon: Option<Arc<Lexicon>>,
}

impl Tokenizer {
    /// 新しいトークナイザーを作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - トークン化に使用するシステム辞書
    pub fn new(dict: Dictionary) -> Self {
        Self {
            dict,
            user_lexicon: None,
        }
    }

    /// ユーザー辞書を差し替えたトークナイザーを返します。
    ///
    /// ユーザー辞書のエントリは、同じ位置のシステムエントリより先に
    /// ラティスへ挿入されます。`None`を渡すとユーザー辞書を外します。
    ///
    /// # エラー
    ///
    /// ユーザー辞書の接続IDがシステム辞書の接続行列の範囲外の場合、
    /// [`KotohaError`]を返します。
    pub fn reset_user_lexicon(mut self, user_dict: Option<UserDictionary>) -> Result<Self> {
        if let Some(user_dict) = user_dict {
            let lexicon = user_dict.into_lexicon();
            if !lexicon.verify(self.dict.inner().connector()) {
                return Err(KotohaError::invalid_format(
                    "user dictionary",
                    "includes connection ids outside the matrix bounds",
                ));
            }
            self.user_lexicon = Some(Arc::new(lexicon));
        } else {
            self.user_lexicon = None;
        }
        Ok(self)
    }

    /// ユーザー辞書が適用されているかどうかを返します。
    pub fn has_user_lexicon(&self) -> bool {
        self.user_lexicon.is_some()
    }

    /// 単語の素性文字列を取得します。
    ///
    /// # Panics
    ///
    /// ユーザー辞書が適用されていない状態でユーザー辞書由来の
    /// [`WordIdx`]を渡した場合にパニックします。
    pub(crate) fn word_feature(&self, word_idx: WordIdx) -> &str {
        match word_idx.lex_type {
            LexType::System => self.dict.inner().lexicon().word_feature(word_idx),
            LexType::User => self
                .user_lexicon
                .as_ref()
                .expect("the user lexicon must be set for a user word")
                .word_feature(word_idx),
            LexType::Unknown => self.dict.inner().unk_handler().word_feature(),
        }
    }

    /// 新しいワーカーを作成します。
    ///
    /// ワーカーは実際の解析処理を実行するために使用されます。
    /// 各ワーカーは独立したラティス構造を保持するため、複数のワーカーを
    /// 並列に使用して同時に複数の文を解析できます。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// 入力文に対してラティスを構築します。
    ///
    /// すべての開始位置で共通接頭辞検索を行い、ユーザー辞書、システム辞書の
    /// 順にエッジを挿入します。どちらにも一致しない位置には1文字の未知語
    /// エッジを挿入するため、経路は常に存在します。
    pub(crate) fn build_lattice(&self, sent: &Sentence, lattice: &mut Lattice) {
        lattice.reset(sent.len_char());
        let connector = self.dict.inner().connector();

        for start_word in 0..sent.len_char() {
            if !lattice.has_previous_node(start_word) {
                continue;
            }
            self.add_lattice_edges(sent, lattice, start_word, connector);
        }

        lattice.insert_eos(connector);
    }

    /// 指定位置から始まるエッジをラティスへ追加します。
    fn add_lattice_edges<C>(
        &self,
        sent: &Sentence,
        lattice: &mut Lattice,
        start_word: usize,
        connector: &C,
    ) where
        C: ConnectorCost,
    {
        let mut has_matched = false;
        let suffix = &sent.chars()[start_word..];

        if let Some(user_lexicon) = self.user_lexicon.as_ref() {
            for m in user_lexicon.common_prefix_iterator(suffix) {
                debug_assert!(start_word + m.end_char <= sent.len_char());
                lattice.insert_node(
                    start_word,
                    start_word + m.end_char,
                    m.word_idx,
                    m.word_param,
                    connector,
                );
                has_matched = true;
            }
        }

        for m in self.dict.inner().lexicon().common_prefix_iterator(suffix) {
            debug_assert!(start_word + m.end_char <= sent.len_char());
            lattice.insert_node(
                start_word,
                start_word + m.end_char,
                m.word_idx,
                m.word_param,
                connector,
            );
            has_matched = true;
        }

        self.dict
            .inner()
            .unk_handler()
            .gen_unk_word(sent, start_word, has_matched, |w| {
                lattice.insert_node(
                    w.start_char(),
                    w.end_char(),
                    w.word_idx(),
                    w.word_param(),
                    connector,
                );
            });
    }
}
