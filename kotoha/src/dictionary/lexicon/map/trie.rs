//! ダブル配列トライによる高速文字列検索
//!
//! このモジュールは、表層形の共通接頭辞検索のためのダブル配列トライを提供します。
//! トライは`base`と`check`の2本の配列で表現され、1文字あたりの遷移が
//! 配列参照1回で完了します。
//!
//! 文字は出現頻度の降順に割り当てたコンパクトなコードへ写像してから
//! 遷移に使用します。コード`0`は終端遷移として予約されており、
//! 終端スロットの`base`フィールドにリーフの値を格納します。
//!
//! 同一のソート済みレコード列からは常に同一の配列が構築されます。
//! 入力順に依存しないこの性質は、辞書コンパイルの決定性の土台です。

use hashbrown::HashMap;

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{KotohaError, Result};
use crate::utils::FromU32;

/// 空きスロットを表す番兵値。
const INVALID: u32 = u32::MAX;

/// 終端遷移に予約されたコード。
const TERMINAL_CODE: u32 = 0;

/// ダブル配列の1スロット
///
/// 内部ノードでは`base`が子スロットの基準位置、`check`が親ノードの添字です。
/// 終端スロットでは`base`がリーフの値を保持します。
#[derive(Debug, Clone, Copy, Archive, Serialize, Deserialize)]
pub struct TrieSlot {
    base: u32,
    check: u32,
}

/// 文字からコードへの対応表の1エントリ
#[derive(Debug, Clone, Copy, Archive, Serialize, Deserialize)]
struct CodeEntry {
    ch: u32,
    code: u32,
}

/// ダブル配列トライ
#[derive(Archive, Serialize, Deserialize)]
pub struct Trie {
    slots: Vec<TrieSlot>,
    // Sorted by codepoint for binary search.
    codes: Vec<CodeEntry>,
}

impl Trie {
    /// ソート済みレコードからトライを構築します。
    ///
    /// # 引数
    ///
    /// * `records` - 表層形と値のペア。表層形の文字列順にソートされ、
    ///   重複がないこと。
    ///
    /// # エラー
    ///
    /// 空のキーが含まれる場合、またはソート済み・一意でない場合に
    /// エラーを返します。
    pub fn from_records<K>(records: &[(K, u32)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        for w in records.windows(2) {
            if w[0].0.as_ref() >= w[1].0.as_ref() {
                return Err(KotohaError::invalid_format(
                    "records",
                    "must be sorted and unique",
                ));
            }
        }
        if records.iter().any(|(k, _)| k.as_ref().is_empty()) {
            return Err(KotohaError::invalid_format(
                "records",
                "must not contain an empty key",
            ));
        }

        let codes = Self::assign_codes(records);
        let code_of: HashMap<u32, u32> = codes.iter().map(|e| (e.ch, e.code)).collect();

        let keys: Vec<Vec<u32>> = records
            .iter()
            .map(|(k, _)| k.as_ref().chars().map(|c| code_of[&(c as u32)]).collect())
            .collect();
        let values: Vec<u32> = records.iter().map(|(_, v)| *v).collect();

        let mut builder = TrieBuilder::new();
        if !keys.is_empty() {
            builder.arrange(&keys, &values, 0, 0..keys.len(), 0)?;
        }

        Ok(Self {
            slots: builder.slots,
            codes,
        })
    }

    /// 入力の接頭辞に一致するキーを短い順に返すイテレータを取得します。
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(&'a self, input: &'a [char]) -> CommonPrefixIter<'a> {
        CommonPrefixIter {
            trie: self,
            input,
            node: 0,
            pos: 0,
            dead: self.slots.is_empty(),
        }
    }

    /// 文字の出現頻度の降順にコードを割り当てます。
    ///
    /// 頻度が高い文字ほど小さいコードを持ち、`base`の探索範囲が詰まります。
    /// 同頻度の文字はコードポイント順で安定化します。
    fn assign_codes<K>(records: &[(K, u32)]) -> Vec<CodeEntry>
    where
        K: AsRef<str>,
    {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for (k, _) in records {
            for c in k.as_ref().chars() {
                *counts.entry(c as u32).or_insert(0) += 1;
            }
        }
        let mut freq: Vec<(u32, u32)> = counts.into_iter().collect();
        freq.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut codes: Vec<CodeEntry> = freq
            .iter()
            .enumerate()
            .map(|(i, &(ch, _))| CodeEntry {
                ch,
                code: u32::try_from(i + 1).unwrap(),
            })
            .collect();
        codes.sort_unstable_by_key(|e| e.ch);
        codes
    }

    /// 文字に対応するコードを返します。未登録の文字は`None`です。
    #[inline(always)]
    fn code(&self, c: char) -> Option<u32> {
        self.codes
            .binary_search_by_key(&(c as u32), |e| e.ch)
            .ok()
            .map(|i| self.codes[i].code)
    }

    /// ノードに終端があればその値を返します。
    #[inline(always)]
    fn value_at(&self, node: u32) -> Option<u32> {
        let base = self.slots[usize::from_u32(node)].base;
        if base == INVALID {
            return None;
        }
        let slot = usize::from_u32(base + TERMINAL_CODE);
        self.slots
            .get(slot)
            .filter(|s| s.check == node)
            .map(|s| s.base)
    }

    /// `node`から`code`で遷移した先のノードを返します。
    #[inline(always)]
    fn child(&self, node: u32, code: u32) -> Option<u32> {
        let base = self.slots[usize::from_u32(node)].base;
        if base == INVALID {
            return None;
        }
        let next = base + code;
        self.slots
            .get(usize::from_u32(next))
            .filter(|s| s.check == node)
            .map(|_| next)
    }
}

/// トライマッチング結果
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieMatch {
    pub value: u32,
    pub end_char: usize,
}

impl TrieMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(value: u32, end_char: usize) -> Self {
        Self { value, end_char }
    }
}

/// 共通接頭辞検索のイテレータ
pub struct CommonPrefixIter<'a> {
    trie: &'a Trie,
    input: &'a [char],
    node: u32,
    pos: usize,
    dead: bool,
}

impl Iterator for CommonPrefixIter<'_> {
    type Item = TrieMatch;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.dead && self.pos < self.input.len() {
            let Some(code) = self.trie.code(self.input[self.pos]) else {
                self.dead = true;
                return None;
            };
            let Some(next) = self.trie.child(self.node, code) else {
                self.dead = true;
                return None;
            };
            self.node = next;
            self.pos += 1;
            if let Some(value) = self.trie.value_at(self.node) {
                return Some(TrieMatch::new(value, self.pos));
            }
        }
        None
    }
}

/// ダブル配列を構築する内部ビルダー
struct TrieBuilder {
    slots: Vec<TrieSlot>,
    // The smallest index that may still be vacant. Search hint only.
    search_start: u32,
}

impl TrieBuilder {
    fn new() -> Self {
        Self {
            slots: vec![TrieSlot {
                base: INVALID,
                check: INVALID,
            }],
            search_start: 1,
        }
    }

    /// `range`のキーが深さ`depth`までの接頭辞を共有しているとき、
    /// その接頭辞に対応するノード`node`の子スロットを配置します。
    fn arrange(
        &mut self,
        keys: &[Vec<u32>],
        values: &[u32],
        node: u32,
        range: std::ops::Range<usize>,
        depth: usize,
    ) -> Result<()> {
        debug_assert!(!range.is_empty());

        // Partition the range into a terminal key and child groups.
        let mut lo = range.start;
        let mut terminal: Option<u32> = None;
        if keys[lo].len() == depth {
            terminal = Some(values[lo]);
            lo += 1;
        }
        let mut groups: Vec<(u32, std::ops::Range<usize>)> = vec![];
        let mut i = lo;
        while i < range.end {
            let code = keys[i][depth];
            let mut j = i + 1;
            while j < range.end && keys[j][depth] == code {
                j += 1;
            }
            groups.push((code, i..j));
            i = j;
        }

        let mut child_codes: Vec<u32> = vec![];
        if terminal.is_some() {
            child_codes.push(TERMINAL_CODE);
        }
        child_codes.extend(groups.iter().map(|(c, _)| *c));
        debug_assert!(!child_codes.is_empty());

        let base = self.find_base(&child_codes)?;
        self.slots[usize::from_u32(node)].base = base;
        for &code in &child_codes {
            let idx = usize::from_u32(base + code);
            self.slots[idx].check = node;
        }
        if let Some(value) = terminal {
            self.slots[usize::from_u32(base + TERMINAL_CODE)].base = value;
        }
        for (code, sub) in groups {
            self.arrange(keys, values, base + code, sub, depth + 1)?;
        }
        Ok(())
    }

    /// すべての子コードが空きスロットに収まる最小の`base`を探します。
    fn find_base(&mut self, codes: &[u32]) -> Result<u32> {
        while usize::from_u32(self.search_start) < self.slots.len()
            && !self.is_vacant(self.search_start)
        {
            self.search_start += 1;
        }

        let first = codes[0];
        let mut base = self.search_start.saturating_sub(first).max(1);
        'search: loop {
            for &code in codes {
                let idx = base
                    .checked_add(code)
                    .ok_or_else(|| KotohaError::invalid_format("records", "trie index overflow"))?;
                self.ensure_slot(idx);
                if !self.is_vacant(idx) {
                    base += 1;
                    continue 'search;
                }
            }
            return Ok(base);
        }
    }

    #[inline(always)]
    fn is_vacant(&self, idx: u32) -> bool {
        self.slots[usize::from_u32(idx)].check == INVALID
    }

    fn ensure_slot(&mut self, idx: u32) {
        let idx = usize::from_u32(idx);
        if idx >= self.slots.len() {
            self.slots.resize(
                idx + 1,
                TrieSlot {
                    base: INVALID,
                    check: INVALID,
                },
            );
        }
    }
}
