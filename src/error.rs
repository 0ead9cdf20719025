use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoCritiqueError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`photo-critique config --set-api-key YOUR_KEY` または OPENAI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対応していない画像形式です（JPG/PNG/GIF/WEBPのみ）: {0}")]
    UnsupportedImage(String),

    #[error("画像サイズが上限 {limit_mb}MB を超えています: {path}")]
    ImageTooLarge { path: String, limit_mb: u64 },

    #[error("写真が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("モデルからレビュー本文が返されませんでした")]
    EmptyResponse,

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("履歴が見つかりません: {0}")]
    ReviewNotFound(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] photo_critique_common::Error),
}

pub type Result<T> = std::result::Result<T, PhotoCritiqueError>;
