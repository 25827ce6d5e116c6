//! 統合テスト用のスクリプト化バックエンド
//!
//! 応答を事前にキューへ積み、必要ならoneshotゲートで応答タイミングを
//! テスト側から制御する。

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use tokio::sync::oneshot;

use pricehawk::{CompareOutcome, CompareRequest, ComparisonBackend, ComparisonResult, FetchError};

/// 1回分のスクリプト化されたcompare応答
pub struct ScriptedCompare {
    pub response: Result<CompareOutcome, FetchError>,
    /// バックエンド到達時に発火する通知
    pub started: Option<oneshot::Sender<()>>,
    /// 応答を返す前に待つゲート
    pub gate: Option<oneshot::Receiver<()>>,
}

impl ScriptedCompare {
    pub fn immediate(response: Result<CompareOutcome, FetchError>) -> Self {
        Self {
            response,
            started: None,
            gate: None,
        }
    }

    pub fn gated(
        response: Result<CompareOutcome, FetchError>,
        started: oneshot::Sender<()>,
        gate: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            response,
            started: Some(started),
            gate: Some(gate),
        }
    }
}

/// キューに積まれた応答を順に返す比較バックエンド
#[derive(Default)]
pub struct ScriptedBackend {
    compares: Mutex<VecDeque<ScriptedCompare>>,
    dashboards: Mutex<VecDeque<Result<serde_json::Value, FetchError>>>,
    pub compare_calls: AtomicUsize,
    pub dashboard_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_compare(&self, scripted: ScriptedCompare) {
        self.compares.lock().unwrap().push_back(scripted);
    }

    pub fn push_dashboard(&self, response: Result<serde_json::Value, FetchError>) {
        self.dashboards.lock().unwrap().push_back(response);
    }

    pub fn compare_call_count(&self) -> usize {
        self.compare_calls.load(Ordering::SeqCst)
    }

    pub fn dashboard_call_count(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComparisonBackend for ScriptedBackend {
    async fn compare(&self, _request: &CompareRequest) -> Result<CompareOutcome, FetchError> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.compares.lock().unwrap().pop_front();
        let Some(mut scripted) = scripted else {
            return Err(FetchError::Other(anyhow::anyhow!(
                "no scripted compare response left"
            )));
        };
        if let Some(started) = scripted.started.take() {
            let _ = started.send(());
        }
        if let Some(gate) = scripted.gate.take() {
            let _ = gate.await;
        }
        scripted.response
    }

    async fn fetch_dashboard(&self) -> Result<serde_json::Value, FetchError> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        self.dashboards.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(FetchError::Other(anyhow::anyhow!(
                "no scripted dashboard response left"
            )))
        })
    }
}

/// Flipkartが勝つ典型的な比較結果
pub fn flipkart_wins_result() -> ComparisonResult {
    serde_json::from_value(serde_json::json!({
        "flipkart": {
            "title": "Test Phone 5G (Flipkart)",
            "price": "₹24,999",
            "rating": 4.4,
            "ram": "8 GB",
            "storage": "128 GB",
            "ai_score": 84,
            "ai_verdict": "🟢 Recommended",
            "ai_reasons": ["Excellent 4.4/5 customer rating"],
            "reviews": [
                {"rating": 5.0, "text": "Great phone"},
                {"rating": 4.0, "text": "Solid battery"}
            ]
        },
        "amazon": {
            "title": "Test Phone 5G (Amazon)",
            "price": "₹29,999",
            "rating": 4.1,
            "ai_score": 71
        },
        "winner": "flipkart",
        "price_difference": {"amount": 5000, "cheaper_on": "flipkart", "percentage": 12}
    }))
    .unwrap()
}

/// Amazon単独の比較結果（単一ソースの要約も正当な応答形）
pub fn amazon_only_result() -> ComparisonResult {
    serde_json::from_value(serde_json::json!({
        "flipkart": null,
        "amazon": {
            "title": "Solo Phone (Amazon)",
            "price": "₹15,499",
            "rating": 4.0,
            "ai_score": 68
        },
        "winner": "amazon",
        "price_difference": null
    }))
    .unwrap()
}

/// 両スロット欠落（両方のスクレイプが失敗したときのバックエンド応答）
pub fn empty_result() -> ComparisonResult {
    serde_json::from_value(serde_json::json!({
        "flipkart": null,
        "amazon": null,
        "winner": null,
        "price_difference": null
    }))
    .unwrap()
}
