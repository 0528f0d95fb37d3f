//! ラティス（格子）構造の実装モジュール
//!
//! このモジュールは、最小コスト経路探索のためのラティス構造を提供します。
//! ラティスは文字位置ごとのノード列から構成され、最適なトークン分割を
//! 見つけるために使用されます。

use crate::common::{BOS_EOS_CONNECTION_ID, MAX_SENTENCE_LENGTH};
use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::lexicon::WordParam;
use crate::dictionary::word_idx::WordIdx;
use crate::dictionary::LexType;

const MAX_COST: i32 = i32::MAX;
const INVALID_IDX: u16 = u16::MAX;

/// ラティス内のノード
///
/// 各ノードは単語の候補を表し、位置情報、接続ID、BOSからの最小コストを
/// 保持します。
#[derive(Debug, Clone, Copy)]
pub struct Node {
    /// 単語ID
    pub word_id: u32,
    /// 辞書タイプ（システム辞書、ユーザー辞書、未知語）
    pub lex_type: LexType,
    /// 単語の開始位置（文字単位）
    pub start_word: usize,
    /// 左側の接続ID
    pub left_id: u16,
    /// 右側の接続ID
    pub right_id: u16,
    /// 最小コストを持つ左側ノードのインデックス
    pub min_idx: u16,
    /// BOSからこのノードまでの最小コスト
    pub min_cost: i32,
}

impl Node {
    /// 単語インデックスを取得します。
    #[inline(always)]
    pub fn word_idx(&self) -> WordIdx {
        WordIdx::new(self.lex_type, self.word_id)
    }
}

/// 最小コスト経路探索のためのラティス構造体
///
/// `ends[i]`には位置`i`で終わる候補ノードが格納されます。
#[derive(Default)]
pub struct Lattice {
    ends: Vec<Vec<Node>>,
    eos: Option<Node>,
    len_char: usize, // needed for avoiding to free ends
}

impl Lattice {
    /// ラティスをリセットし、新しい文の処理を準備します。
    ///
    /// # 引数
    ///
    /// * `len_char` - 新しい文の文字数
    pub fn reset(&mut self, len_char: usize) {
        Self::reset_vec(&mut self.ends, len_char + 1);
        self.len_char = len_char;
        self.eos = None;
        self.insert_bos();
    }

    fn reset_vec<T>(data: &mut Vec<Vec<T>>, new_len: usize) {
        for v in data.iter_mut() {
            v.clear();
        }
        let cur_len = data.len();
        if cur_len <= new_len {
            data.reserve(new_len - cur_len);
            for _ in cur_len..new_len {
                data.push(Vec::with_capacity(16))
            }
        }
    }

    /// 設定された文の文字数を返します。
    #[inline(always)]
    pub const fn len_char(&self) -> usize {
        self.len_char
    }

    /// BOS（文頭）ノードを挿入します。
    fn insert_bos(&mut self) {
        self.ends[0].push(Node {
            word_id: u32::MAX,
            lex_type: LexType::default(),
            start_word: MAX_SENTENCE_LENGTH,
            left_id: u16::MAX,
            right_id: BOS_EOS_CONNECTION_ID,
            min_idx: INVALID_IDX,
            min_cost: 0,
        });
    }

    /// EOS（文末）ノードを挿入します。
    ///
    /// # 引数
    ///
    /// * `connector` - 接続コスト計算用のコネクタ
    pub fn insert_eos<C>(&mut self, connector: &C)
    where
        C: ConnectorCost,
    {
        let (min_idx, min_cost) =
            self.search_min_node(self.len_char, BOS_EOS_CONNECTION_ID, connector);
        self.eos = Some(Node {
            word_id: u32::MAX,
            lex_type: LexType::default(),
            start_word: self.len_char,
            left_id: BOS_EOS_CONNECTION_ID,
            right_id: u16::MAX,
            min_idx,
            min_cost,
        });
    }

    /// ラティスに新しいノードを挿入します。
    ///
    /// # 引数
    ///
    /// * `start_word` - 単語の開始位置
    /// * `end_word` - 単語の終了位置
    /// * `word_idx` - 単語インデックス
    /// * `word_param` - 単語パラメータ（接続ID、コスト）
    /// * `connector` - 接続コスト計算用のコネクタ
    pub fn insert_node<C>(
        &mut self,
        start_word: usize,
        end_word: usize,
        word_idx: WordIdx,
        word_param: WordParam,
        connector: &C,
    ) where
        C: ConnectorCost,
    {
        debug_assert!(start_word < end_word);
        let (min_idx, min_cost) = self.search_min_node(start_word, word_param.left_id, connector);
        self.ends[end_word].push(Node {
            word_id: word_idx.word_id,
            lex_type: word_idx.lex_type,
            start_word,
            left_id: word_param.left_id,
            right_id: word_param.right_id,
            min_idx,
            min_cost: min_cost.saturating_add(i32::from(word_param.word_cost)),
        });
    }

    /// 指定位置で終わるノードのうち、接続コストを含めた最小コストの
    /// ノードを探します。
    ///
    /// コストが同じ場合は開始位置が小さい（=より長い）トークンを選び、
    /// それも同じ場合は先に挿入されたノードを保持します。ユーザー辞書の
    /// エッジはシステム辞書より先に挿入されるため、この順序付けで
    /// 同コストの競合はユーザーエントリが制します。
    fn search_min_node<C>(&self, start_word: usize, left_id: u16, connector: &C) -> (u16, i32)
    where
        C: ConnectorCost,
    {
        debug_assert!(!self.ends[start_word].is_empty());

        let mut min_idx = INVALID_IDX;
        let mut min_cost = MAX_COST;
        let mut min_start = usize::MAX;
        for (i, left_node) in self.ends[start_word].iter().enumerate() {
            let conn_cost = connector.cost(left_node.right_id, left_id);
            let new_cost = left_node.min_cost.saturating_add(conn_cost);
            if new_cost < min_cost || (new_cost == min_cost && left_node.start_word < min_start) {
                min_idx = i as u16;
                min_cost = new_cost;
                min_start = left_node.start_word;
            }
        }

        debug_assert_ne!(min_idx, INVALID_IDX);
        (min_idx, min_cost)
    }

    /// 指定位置に少なくとも1つのノードが存在するかチェックします。
    #[inline(always)]
    pub fn has_previous_node(&self, i: usize) -> bool {
        self.ends.get(i).map(|d| !d.is_empty()).unwrap_or(false)
    }

    /// 最良パスのノードをベクトルに追加します。
    ///
    /// EOSから後方にたどり、最良パスを構成するすべてのノードを
    /// 終了位置とともに追加します（文末から文頭の順）。
    pub fn append_top_nodes(&self, top_nodes: &mut Vec<(usize, Node)>) {
        let eos = self.eos.as_ref().unwrap();
        let mut end_word = eos.start_word;
        let mut min_idx = eos.min_idx;
        while end_word != 0 {
            let node = &self.ends[end_word][usize::from(min_idx)];
            top_nodes.push((end_word, *node));
            (end_word, min_idx) = (node.start_word, node.min_idx);
        }
    }
}

impl std::fmt::Debug for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lattice {{ eos: {:?}, ends: [", &self.eos)?;
        for (i, e) in self.ends[..=self.len_char()].iter().enumerate() {
            writeln!(f, "{i} => {e:?}")?;
        }
        writeln!(f, "]}}")
    }
}
