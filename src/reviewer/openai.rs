//! OpenAI Responses API連携
//!
//! プロンプト（テキスト）と写真（Data URL）を1つのユーザーメッセージで送信し、
//! 返ってきた講評テキストを取り出す。

use crate::error::{PhotoCritiqueError, Result};
use crate::scanner::PhotoData;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;

const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Responses APIリクエスト
#[derive(Serialize)]
pub(crate) struct ResponsesRequest {
    model: String,
    input: Vec<InputMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct InputMessage {
    role: &'static str,
    content: Vec<InputPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputPart {
    InputText { text: String },
    InputImage { image_url: String },
}

/// 写真をData URLに変換
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, encoded)
}

pub(crate) fn build_request(
    model: &str,
    temperature: f32,
    prompt: &str,
    photo: &PhotoData,
) -> ResponsesRequest {
    ResponsesRequest {
        model: model.to_string(),
        input: vec![InputMessage {
            role: "user",
            content: vec![
                InputPart::InputText {
                    text: prompt.to_string(),
                },
                InputPart::InputImage {
                    image_url: to_data_url(photo.info.mime_type, &photo.bytes),
                },
            ],
        }],
        temperature,
    }
}

/// レスポンスから講評テキストを取り出す
///
/// 優先順位:
/// 1. output[0].content 内の最初の output_text
/// 2. トップレベルの output_text
pub fn extract_output_text(payload: &Value) -> Option<String> {
    let from_output = payload
        .get("output")
        .and_then(|o| o.get(0))
        .and_then(|o| o.get("content"))
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .find(|item| item.get("type").and_then(Value::as_str) == Some("output_text"))
        })
        .and_then(|item| item.get("text"))
        .and_then(Value::as_str);

    from_output
        .or_else(|| payload.get("output_text").and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub async fn request_review(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    temperature: f32,
    prompt: &str,
    photo: &PhotoData,
) -> Result<String> {
    let request = build_request(model, temperature, prompt, photo);

    tracing::debug!(
        model = %model,
        file = %photo.info.file_name,
        bytes = photo.bytes.len(),
        "OpenAIへ講評をリクエスト"
    );

    let response = client
        .post(OPENAI_RESPONSES_URL)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        let message = if message.trim().is_empty() {
            format!("OpenAI request failed ({})", status)
        } else {
            message
        };
        return Err(PhotoCritiqueError::ApiCall(message));
    }

    let payload: Value = response.json().await?;
    extract_output_text(&payload).ok_or(PhotoCritiqueError::EmptyResponse)
}
