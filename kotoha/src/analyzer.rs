//! 解析コンテキスト
//!
//! このモジュールは、テキストから音素・カナ列への変換パイプライン全体を
//! 束ねる解析コンテキスト[`Kotoha`]を提供します。コンテキストは
//! システム辞書のスナップショットを保持し、ユーザー辞書の適用を
//! スナップショットの原子的な差し替えとして行います。
//!
//! 1つのプロセスに複数の独立したコンテキストを作れます。グローバルな
//! 共有状態はありません。

use std::path::Path;
use std::sync::RwLock;

use crate::dictionary::{Dictionary, UserDictionary};
use crate::errors::Result;
use crate::estimator::{AccentEstimator, NoopAccentEstimator};
use crate::format::{render, G2pOption, G2pOutput};
use crate::label::{convert, Label};
use crate::node::FeatureNode;
use crate::rewrite::rewrite;
use crate::tokenizer::Tokenizer;

/// テキストから音素・カナ列への変換を行う解析コンテキスト
///
/// # 例
///
/// ```no_run
/// use kotoha::{G2pOption, Kotoha};
///
/// let analyzer = Kotoha::from_path("path/to/system.dic")?;
/// let phones = analyzer.g2p("こんにちは", &G2pOption::default());
/// println!("{}", phones.into_string());
/// # Ok::<(), kotoha::errors::KotohaError>(())
/// ```
pub struct Kotoha {
    tokenizer: RwLock<Tokenizer>,
    estimator: Box<dyn AccentEstimator + Send + Sync>,
}

impl Kotoha {
    /// システム辞書から新しい解析コンテキストを作成します。
    pub fn new(dict: Dictionary) -> Self {
        Self {
            tokenizer: RwLock::new(Tokenizer::new(dict)),
            estimator: Box::new(NoopAccentEstimator),
        }
    }

    /// コンパイル済みのシステム辞書ファイルから解析コンテキストを
    /// 作成します。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Ok(Self::new(Dictionary::from_path(path)?))
    }

    /// アクセント推定器を差し替えたコンテキストを返します。
    ///
    /// 推定器は[`make_labels`](Self::make_labels)の先頭で呼び出され、
    /// 返されたアクセント型がノードへ適用されます。
    pub fn with_accent_estimator(
        mut self,
        estimator: Box<dyn AccentEstimator + Send + Sync>,
    ) -> Self {
        self.estimator = estimator;
        self
    }

    /// 現在のトークナイザースナップショットを取得します。
    ///
    /// スナップショットは読み取りロックの下でクローンされます。以後の
    /// 解析はロックを保持せずに進み、途中でユーザー辞書が差し替わっても
    /// 影響を受けません。
    fn snapshot(&self) -> Tokenizer {
        self.tokenizer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// テキストをトークン化し、書き換え済みの素性ノード列を返します。
    ///
    /// 出力ノードの表層形を連結すると入力テキストに一致します。
    /// 空のテキストは空の列になります。
    pub fn run_frontend(&self, text: &str) -> Vec<FeatureNode> {
        let tokenizer = self.snapshot();
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();
        let mut nodes = worker.feature_nodes();
        rewrite(&mut nodes);
        tracing::debug!(chars = text.chars().count(), nodes = nodes.len(), "ran the frontend");
        nodes
    }

    /// 素性ノード列をラベル列へ変換します。
    ///
    /// アクセント推定器が有効な場合、まず推定器の返したアクセント型を
    /// ノードへ適用し、そのうえでアクセント依存の変換を行います。
    pub fn make_labels(&self, nodes: &[FeatureNode]) -> Vec<Label> {
        match self.estimator.estimate(nodes) {
            Some(accents) if accents.len() == nodes.len() => {
                let mut revised = nodes.to_vec();
                for (node, acc) in revised.iter_mut().zip(accents) {
                    node.acc = acc.max(0);
                }
                convert(&revised)
            }
            _ => convert(nodes),
        }
    }

    /// テキストを音素記号列またはカナ列へ変換します。
    ///
    /// パイプライン全体（トークン化、書き換え、ラベル変換、描画）を
    /// 実行します。空のテキストは空の出力になります。
    pub fn g2p(&self, text: &str, opt: &G2pOption) -> G2pOutput {
        let nodes = self.run_frontend(text);
        let labels = self.make_labels(&nodes);
        render(&labels, opt)
    }

    /// コンパイル済みのユーザー辞書を適用します。
    ///
    /// 読み込みと検証に成功した場合にのみ、トークナイザーの
    /// スナップショットを原子的に差し替えます。失敗した場合、適用中の
    /// 辞書はそのまま残ります。実行中の解析は差し替え前後いずれかの
    /// スナップショットを一貫して観測します。
    pub fn apply_user_dictionary<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let user_dict = UserDictionary::from_path(path)?;
        let mut guard = self.tokenizer.write().unwrap_or_else(|e| e.into_inner());
        *guard = guard.clone().reset_user_lexicon(Some(user_dict))?;
        tracing::info!("applied a user dictionary");
        Ok(())
    }

    /// 適用中のユーザー辞書を外します。
    pub fn clear_user_dictionary(&self) {
        let mut guard = self.tokenizer.write().unwrap_or_else(|e| e.into_inner());
        // Removing the overlay cannot fail.
        if let Ok(tokenizer) = guard.clone().reset_user_lexicon(None) {
            *guard = tokenizer;
        }
    }

    /// ユーザー辞書が適用されているかどうかを返します。
    pub fn has_user_dictionary(&self) -> bool {
        self.tokenizer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_user_lexicon()
    }
}
