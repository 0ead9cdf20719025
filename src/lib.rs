//! photo-critique
//!
//! 写真をビジョン対応モデルに送り、構造化された講評と履歴を扱うCLIの本体。
//! プロンプト生成とパーサーは photo_critique_common にある。

pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod render;
pub mod reviewer;
pub mod scanner;
