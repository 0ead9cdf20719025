use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// OpenAI Responses API
    #[default]
    #[value(name = "openai")]
    OpenAi,
    /// ローカルの claude CLI
    Claude,
}

impl AiProvider {
    /// 履歴に記録するモデル名
    pub fn label(&self, model: &str) -> String {
        match self {
            AiProvider::OpenAi => format!("openai:{}", model),
            AiProvider::Claude => "claude-cli".to_string(),
        }
    }
}
