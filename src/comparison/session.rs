use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::client::{CompareOutcome, CompareRequest, ComparisonBackend, ProductUrl};
use crate::comparison::history::{HistoryCache, HistoryEntry};
use crate::comparison::models::ComparisonResult;
use crate::utils;

/// 入力が両方空だったときのバリデーションメッセージ
pub const VALIDATION_MESSAGE: &str = "Please enter at least one product URL";

/// トランスポート成功なのに商品が1件も載っていなかったときのメッセージ
pub const NO_USABLE_RESULT_MESSAGE: &str = "No usable product data extracted";

/// 比較セッションのエラー分類
///
/// Validation はローカル検出でネットワークに到達しない。
/// ComparisonFailed はバックエンドが返したドメインエラー文字列をそのまま
/// 保持する。BackendUnavailable はトランスポート障害全般。
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    ComparisonFailed(String),
    #[error("Cannot connect to comparison backend: {0}")]
    BackendUnavailable(String),
}

/// セッションのライフサイクルフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// ビューが表示する唯一の真実となるセッション状態
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// 直近のエラー（Errorフェーズのときのみ）
    pub error: Option<SessionError>,
    /// 現在表示中の比較結果
    pub current: Option<ComparisonResult>,
    /// 結果セクションを表示してよいか
    pub show_results: bool,
}

/// `submit` 呼び出し1回の帰結
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 完了結果が現在の状態に反映された
    Applied,
    /// 後続の submit に追い越され、完了結果は破棄された
    Superseded,
    /// バリデーションで拒否され、送信しなかった
    Rejected,
}

struct SessionInner {
    state: SessionState,
    /// 古い完了を破棄するための世代カウンタ
    generation: u64,
}

/// 比較リクエストのライフサイクルを管理するセッション
///
/// 状態遷移は Idle → Pending → Success | Error。次の submit は常に状態を
/// リセットして新しい Pending に入る（last-submission-wins）。追い越された
/// リクエストの完了は世代カウンタの比較で破棄される。
pub struct ComparisonSession {
    backend: Arc<dyn ComparisonBackend>,
    inner: Arc<Mutex<SessionInner>>,
    history: Arc<Mutex<HistoryCache>>,
}

impl ComparisonSession {
    pub fn new(backend: Arc<dyn ComparisonBackend>) -> Self {
        Self {
            backend,
            inner: Arc::new(Mutex::new(SessionInner {
                state: SessionState::default(),
                generation: 0,
            })),
            history: Arc::new(Mutex::new(HistoryCache::new())),
        }
    }

    /// 比較履歴への共有ハンドルを取得
    pub fn history(&self) -> Arc<Mutex<HistoryCache>> {
        Arc::clone(&self.history)
    }

    /// 現在のセッション状態のスナップショットを取得
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// 履歴スナップショットを新しい順で取得
    pub async fn history_snapshot(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.iter().cloned().collect()
    }

    /// 比較リクエストを送信する
    ///
    /// 空白のみの入力は存在しないものとして扱う。両方空ならバリデーション
    /// エラーでネットワークには出ない。成功した結果は状態を公開する前に
    /// 履歴へコミットする。
    pub async fn submit(&self, flipkart_url: &str, amazon_url: &str) -> SubmitOutcome {
        let flipkart = normalize_input(flipkart_url);
        let amazon = normalize_input(amazon_url);

        if flipkart.is_none() && amazon.is_none() {
            tracing::warn!("⚠️ Rejected submission with no product URL");
            let mut inner = self.inner.lock().await;
            // 直前の送信が未解決でも、最後の操作はこの送信。世代を進めて
            // 遅延完了がこのエラー表示を上書きしないようにする
            inner.generation += 1;
            inner.state = SessionState {
                phase: SessionPhase::Error,
                error: Some(SessionError::Validation(VALIDATION_MESSAGE.to_string())),
                current: None,
                show_results: false,
            };
            return SubmitOutcome::Rejected;
        }

        // Pendingへ遷移: 前回の結果とエラーをクリアし、世代を進める
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.state = SessionState {
                phase: SessionPhase::Pending,
                error: None,
                current: None,
                show_results: false,
            };
            inner.generation
        };

        let request = CompareRequest {
            flipkart_url: flipkart,
            amazon_url: amazon,
        };
        tracing::info!("🔍 Submitting comparison (generation {})", generation);

        let outcome = self.backend.compare(&request).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            tracing::debug!(
                "🗑️ Discarding stale completion for generation {} (current {})",
                generation,
                inner.generation
            );
            return SubmitOutcome::Superseded;
        }

        match outcome {
            Ok(CompareOutcome::Result(result)) if result.has_any_product() => {
                let entry = {
                    let mut history = self.history.lock().await;
                    history.record(result.clone())
                };
                tracing::info!(
                    "✅ Comparison succeeded, committed history entry {}",
                    entry.id
                );
                inner.state = SessionState {
                    phase: SessionPhase::Success,
                    error: None,
                    current: Some(result),
                    show_results: true,
                };
            }
            Ok(CompareOutcome::Result(_)) => {
                // 両スロット欠落はSuccessにも履歴にも到達させない
                tracing::warn!("⚠️ Backend returned a result with no product data");
                inner.state = error_state(SessionError::ComparisonFailed(
                    NO_USABLE_RESULT_MESSAGE.to_string(),
                ));
            }
            Ok(CompareOutcome::Rejected { message }) => {
                tracing::warn!("⚠️ Comparison rejected by backend: {}", message);
                inner.state = error_state(SessionError::ComparisonFailed(message));
            }
            Err(e) => {
                tracing::error!("❌ Comparison backend unreachable: {}", e);
                inner.state = error_state(SessionError::BackendUnavailable(e.to_string()));
            }
        }
        SubmitOutcome::Applied
    }
}

fn error_state(error: SessionError) -> SessionState {
    SessionState {
        phase: SessionPhase::Error,
        error: Some(error),
        current: None,
        show_results: false,
    }
}

/// 入力URLをトリムし、空なら None、それ以外は正規化して返す
fn normalize_input(raw: &str) -> Option<ProductUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(ProductUrl(utils::clean_product_url(trimmed)))
}
