//! Photo Critique Common Library
//!
//! CLIと履歴ストアで共有される型と純粋関数:
//! - プロンプト生成（見出しの契約）
//! - タイトル分離とレビューパーサー

pub mod error;
pub mod parser;
pub mod prompts;
pub mod types;

pub use error::{Error, Result};
pub use parser::{extract_score, parse_review, split_title, strip_bullet};
pub use prompts::{build_review_prompt, exif_summary_line, REVIEW_HEADINGS};
pub use types::{ExifSummary, ParsedReview, Section, TitledReview};
