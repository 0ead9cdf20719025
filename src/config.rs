use crate::error::{PhotoCritiqueError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    /// アップロード上限（MB）
    pub max_image_mb: u64,
    pub timeout_seconds: u64,
    pub temperature: f32,
    /// 履歴一覧の表示件数
    pub history_limit: usize,
    /// 履歴の保持日数（prune時）
    pub retention_days: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            max_image_mb: 8,
            timeout_seconds: 120,
            temperature: 0.4,
            history_limit: 20,
            retention_days: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
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

    /// 設定ディレクトリ（履歴ファイルもここに置く）
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoCritiqueError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-critique"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 環境変数で上書き（OPENAI_MODEL / MAX_IMAGE_MB）
    fn apply_env(&mut self) {
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }

        if let Ok(value) = std::env::var("MAX_IMAGE_MB") {
            match value.trim().parse::<u64>() {
                Ok(mb) if mb > 0 => self.max_image_mb = mb,
                _ => tracing::warn!(value = %value, "MAX_IMAGE_MB が不正なため無視します"),
            }
        }
    }

    pub fn max_image_bytes(&self) -> u64 {
        self.max_image_mb.saturating_mul(1024 * 1024)
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(PhotoCritiqueError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
