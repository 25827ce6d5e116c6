use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::client::ComparisonBackend;
use crate::comparison::history::HistoryCache;
use crate::comparison::models::{Marketplace, Winner};

/// ローカル履歴から導出するダッシュボード統計
///
/// 同点は勝利カウントに含めない。節約額は price_difference が存在する
/// エントリの差額の合計。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalStats {
    /// 比較回数
    pub total_comparisons: usize,
    /// Flipkartの勝利数
    pub flipkart_wins: usize,
    /// Amazonの勝利数
    pub amazon_wins: usize,
    /// 節約額の合計
    pub total_savings: f64,
}

impl LocalStats {
    /// 履歴から統計を計算する（履歴が同じなら出力も同じ）
    pub fn compute(history: &HistoryCache) -> Self {
        let flipkart_wins =
            history.count_where(|entry| entry.result.winner == Some(Winner::Flipkart));
        let amazon_wins = history.count_where(|entry| entry.result.winner == Some(Winner::Amazon));
        let total_savings = history
            .iter()
            .filter_map(|entry| entry.result.price_difference.as_ref())
            .map(|diff| diff.amount)
            .sum();

        Self {
            total_comparisons: history.len(),
            flipkart_wins,
            amazon_wins,
            total_savings,
        }
    }

    /// 指定マーケットプレイスの勝利数を取得
    pub fn wins_for(&self, market: Marketplace) -> usize {
        match market {
            Marketplace::Flipkart => self.flipkart_wins,
            Marketplace::Amazon => self.amazon_wins,
        }
    }
}

/// リモート集計のスナップショット
///
/// 取得に失敗した場合は `Degraded` に縮退する。呼び出し側は形（variant）で
/// 本物のスナップショットと縮退値を区別する。
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardSnapshot {
    /// バックエンドが返した不透明なペイロード
    Remote(serde_json::Value),
    /// 到達不能時の縮退値
    Degraded,
}

impl DashboardSnapshot {
    pub fn is_degraded(&self) -> bool {
        matches!(self, DashboardSnapshot::Degraded)
    }

    /// 表示層へ渡すJSON表現（縮退値は `{"fallback": true}`）
    pub fn as_json(&self) -> serde_json::Value {
        match self {
            DashboardSnapshot::Remote(value) => value.clone(),
            DashboardSnapshot::Degraded => serde_json::json!({"fallback": true}),
        }
    }
}

/// リモートのダッシュボード集計を取得するサービス
///
/// 失敗をキャッシュしない。成功もキャッシュしない。ビューがダッシュボードを
/// 開くたびに新しく取得する。
pub struct DashboardService {
    backend: Arc<dyn ComparisonBackend>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn ComparisonBackend>) -> Self {
        Self { backend }
    }

    /// リモート集計を取得する（呼び出し側にエラーは伝播しない）
    pub async fn fetch_snapshot(&self) -> DashboardSnapshot {
        match self.backend.fetch_dashboard().await {
            Ok(payload) => {
                tracing::debug!("📊 Dashboard snapshot received");
                DashboardSnapshot::Remote(payload)
            }
            Err(e) => {
                tracing::warn!("📊 Dashboard fetch failed, serving degraded snapshot: {}", e);
                DashboardSnapshot::Degraded
            }
        }
    }
}
