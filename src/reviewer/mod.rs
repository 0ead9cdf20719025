//! 講評リクエスト
//!
//! プロンプト生成 → モデル呼び出し → タイトル分離 までを担当する。
//! 構造化（parse_review）は表示側で行う。

mod claude_cli;
pub mod openai;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{PhotoCritiqueError, Result};
use crate::scanner::PhotoData;
use photo_critique_common::{build_review_prompt, split_title};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// モデル呼び出しの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub title: Option<String>,
    /// タイトル行を除いた講評本文
    pub review: String,
    pub model: String,
}

/// 生テキストからタイトルを分離して結果にまとめる
pub fn finish_review(raw: &str, model: &str) -> Result<ReviewOutcome> {
    if raw.trim().is_empty() {
        return Err(PhotoCritiqueError::EmptyResponse);
    }

    let split = split_title(raw);
    Ok(ReviewOutcome {
        title: split.title,
        review: split.body.trim().to_string(),
        model: model.to_string(),
    })
}

pub struct Reviewer {
    provider: AiProvider,
    model: String,
    temperature: f32,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Reviewer {
    pub fn new(provider: AiProvider, config: &Config) -> Result<Self> {
        let api_key = match provider {
            AiProvider::OpenAi => Some(config.get_api_key()?),
            AiProvider::Claude => None,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
            client,
        })
    }

    /// 履歴に残すモデル名
    pub fn model_label(&self) -> String {
        self.provider.label(&self.model)
    }

    pub async fn review(&self, photo: &PhotoData) -> Result<ReviewOutcome> {
        let prompt = build_review_prompt(photo.info.exif.as_ref());

        let raw = match self.provider {
            AiProvider::OpenAi => {
                let api_key = self.api_key.as_deref().ok_or(PhotoCritiqueError::MissingApiKey)?;
                openai::request_review(
                    &self.client,
                    api_key,
                    &self.model,
                    self.temperature,
                    &prompt,
                    photo,
                )
                .await?
            }
            AiProvider::Claude => claude_cli::request_review(&photo.info, &prompt).await?,
        };

        let outcome = finish_review(&raw, &self.model_label())?;
        tracing::info!(
            file = %photo.info.file_name,
            title = outcome.title.as_deref().unwrap_or("-"),
            "講評を受信"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_review_splits_title() {
        let raw = "Title: Quiet Harbor\nThe Good:\n- Strong leading lines\n\n";
        let outcome = finish_review(raw, "openai:gpt-4.1-mini").unwrap();
        assert_eq!(outcome.title.as_deref(), Some("Quiet Harbor"));
        assert_eq!(outcome.review, "The Good:\n- Strong leading lines");
        assert_eq!(outcome.model, "openai:gpt-4.1-mini");
    }

    #[test]
    fn test_finish_review_without_title() {
        let outcome = finish_review("  The Good:\n- Light  \n", "claude-cli").unwrap();
        assert!(outcome.title.is_none());
        assert_eq!(outcome.review, "The Good:\n- Light");
    }

    #[test]
    fn test_finish_review_empty() {
        assert!(matches!(
            finish_review(" \n ", "claude-cli"),
            Err(PhotoCritiqueError::EmptyResponse)
        ));
    }

    #[test]
    fn test_reviewer_claude_needs_no_key() {
        let reviewer = Reviewer::new(AiProvider::Claude, &Config::default()).unwrap();
        assert_eq!(reviewer.model_label(), "claude-cli");
    }
}
