//! アプリケーション設定管理モジュール
//!
//! XDGディレクトリを使用した設定ファイルの読み込みと保存を提供します。

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 比較バックエンド設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// 比較APIサーバーのベースURL
    pub base_url: String,
    /// リクエストタイムアウト（秒）
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    /// 設定ファイルのパスを取得
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "pricehawk", "pricehawk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// 設定ファイルを読み込む（存在しない・壊れている場合はデフォルト）
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("⚠️ Config directory unavailable, using default backend config");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 指定パスから設定を読み込む
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            debug!("📁 No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    warn!("設定読み込みエラー、デフォルト設定を使用: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("設定読み込みエラー、デフォルト設定を使用: {}", e);
                Self::default()
            }
        }
    }

    /// 設定を保存
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("config directory unavailable")?;
        self.save_to(&path)
    }

    /// 指定パスへ設定を保存
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("💾 Saved backend config to {}", path.display());
        Ok(())
    }
}
