use crate::error::{MealAiError, Result};
use meal_ai_common::WEBHOOK_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Webhook URLを上書きする環境変数
pub const WEBHOOK_URL_ENV: &str = "MEAL_AI_WEBHOOK_URL";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub webhook_url: String,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: WEBHOOK_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MealAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("meal-ai").join("config.json"))
    }

    /// 送信先URL（引数 > 環境変数 > 設定ファイル の順）
    pub fn resolve_webhook_url(&self, override_url: Option<&str>) -> String {
        if let Some(url) = override_url {
            return url.to_string();
        }
        // 環境変数を優先
        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.webhook_url.clone()
    }

    pub fn set_webhook_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MealAiError::Config(format!("URLが不正です: {}", url)));
        }
        self.webhook_url = url;
        self.save()
    }
}
