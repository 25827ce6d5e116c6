//! HTTP client for the comparison/analysis backend.
//!
//! Both operations are idempotent GETs: `/api/compare` resolves up to two
//! product URLs into a `ComparisonResult`, `/api/dashboard` returns an
//! opaque aggregate payload. The `ComparisonBackend` trait is the seam the
//! session core talks through so tests can script responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::comparison::models::{ComparisonResult, PriceDifference, Product, Winner};
use crate::config::BackendConfig;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Anyhow error: {0}")]
    Other(#[from] anyhow::Error),
}

/// 正規化済みの商品ページURL
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
pub struct ProductUrl(pub String);

/// 1回の比較リクエストのパラメータ
///
/// 少なくとも一方のURLが存在することはセッション側のバリデーションで
/// 保証される。
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRequest {
    pub flipkart_url: Option<ProductUrl>,
    pub amazon_url: Option<ProductUrl>,
}

impl CompareRequest {
    /// 非空のパラメータのみをクエリペアとして取得
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(url) = &self.flipkart_url {
            pairs.push(("flipkart_url", url.0.as_str()));
        }
        if let Some(url) = &self.amazon_url {
            pairs.push(("amazon_url", url.0.as_str()));
        }
        pairs
    }
}

/// Transport-level success of a compare call, as a tagged variant:
/// either a usable result or a domain-level rejection carried in the
/// response body (`{"error": ...}`).
#[derive(Debug, Clone, PartialEq)]
pub enum CompareOutcome {
    Result(ComparisonResult),
    Rejected { message: String },
}

/// 比較バックエンドとの境界トレイト（dyn互換）
#[async_trait]
pub trait ComparisonBackend: Send + Sync {
    /// 比較リクエストを送信
    async fn compare(&self, request: &CompareRequest) -> Result<CompareOutcome, FetchError>;

    /// ダッシュボード集計を取得（ペイロードは不透明なJSON）
    async fn fetch_dashboard(&self) -> Result<serde_json::Value, FetchError>;
}

/// Wire shape of the `/api/compare` response body. A domain error arrives
/// as a top-level `error` key instead of the result fields.
#[derive(Debug, Deserialize)]
struct CompareResponseBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    flipkart: Option<Product>,
    #[serde(default)]
    amazon: Option<Product>,
    #[serde(default)]
    winner: Option<Winner>,
    #[serde(default)]
    price_difference: Option<PriceDifference>,
}

impl From<CompareResponseBody> for CompareOutcome {
    fn from(body: CompareResponseBody) -> Self {
        if let Some(message) = body.error {
            return CompareOutcome::Rejected { message };
        }
        CompareOutcome::Result(ComparisonResult {
            flipkart: body.flipkart,
            amazon: body.amazon,
            winner: body.winner,
            price_difference: body.price_difference,
        })
    }
}

/// reqwestベースの比較バックエンドクライアント
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ComparisonBackend for HttpBackend {
    async fn compare(&self, request: &CompareRequest) -> Result<CompareOutcome, FetchError> {
        let endpoint = format!("{}/api/compare", self.base_url);
        tracing::info!("🌐 Requesting comparison from {}", endpoint);

        let response = self
            .http_client
            .get(&endpoint)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Compare request failed: {}", e);
                e
            })?;

        tracing::debug!(
            "📄 Received compare response with status: {}",
            response.status()
        );

        // ドメインエラーは 4xx/5xx でも error キー付きJSONで返るため、
        // ステータスではなくボディの形で判別する
        let body: CompareResponseBody = response.json().await?;
        Ok(CompareOutcome::from(body))
    }

    async fn fetch_dashboard(&self) -> Result<serde_json::Value, FetchError> {
        let endpoint = format!("{}/api/dashboard", self.base_url);
        tracing::debug!("🌐 Requesting dashboard snapshot from {}", endpoint);

        let response = self.http_client.get(&endpoint).send().await?;
        let payload: serde_json::Value = response.json().await?;
        Ok(payload)
    }
}
