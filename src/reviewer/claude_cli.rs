//! Claude CLI連携
//!
//! 写真はファイルパスで渡し、CLIに読み込ませる。

use crate::error::{PhotoCritiqueError, Result};
use crate::scanner::PhotoInfo;
use tokio::process::Command;

/// CLIに渡すプロンプト（写真パス + 講評指示）
pub(crate) fn build_cli_prompt(photo: &PhotoInfo, review_prompt: &str) -> Result<String> {
    let abs_path = std::fs::canonicalize(&photo.path)?;
    let image_path = abs_path.display().to_string().replace('\\', "/");

    Ok(format!(
        "Read the following image file and critique it: {}\n\n{}",
        image_path, review_prompt
    ))
}

pub async fn request_review(photo: &PhotoInfo, review_prompt: &str) -> Result<String> {
    let prompt = build_cli_prompt(photo, review_prompt)?;

    tracing::debug!(file = %photo.file_name, prompt_len = prompt.len(), "Claude CLIへ講評をリクエスト");

    // Windowsではcmd /c経由
    #[cfg(windows)]
    let output = Command::new("cmd")
        .args(["/c", "claude", "-p", &prompt, "--output-format", "text"])
        .output()
        .await
        .map_err(|e| PhotoCritiqueError::CliExecution(format!("Claude CLI実行エラー: {}", e)))?;

    #[cfg(not(windows))]
    let output = Command::new("claude")
        .args(["-p", &prompt, "--output-format", "text"])
        .output()
        .await
        .map_err(|e| PhotoCritiqueError::CliExecution(format!("Claude CLI実行エラー: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PhotoCritiqueError::ApiCall(format!(
            "Claude CLI failed (code {:?}): {}",
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();
    let preview: String = response.chars().take(200).collect();
    tracing::debug!(response_len = response.len(), preview = %preview, "Claude CLIレスポンス");

    Ok(response)
}
