//! 講評シナリオテスト
//!
//! モデル出力 → タイトル分離 → 構造化 → 表示 までを通しで検証

use photo_critique::render::render_review;
use photo_critique::reviewer::finish_review;
use photo_critique_common::{build_review_prompt, parse_review, split_title, ExifSummary, Section};

const HARBOR_OUTPUT: &str = "Title: Quiet Harbor\n\
The Good:\n\
- Strong leading lines\n\
Needs Improvement:\n\
• Horizon tilts left\n\
Technical Suggestions:\n\
* Use f/8\n\
Artistic Suggestions:\n\
- Try dawn light\n\
Overall Score: 7/10\n";

/// 典型的なモデル出力を通しで処理
#[test]
fn test_harbor_review_end_to_end() {
    let outcome = finish_review(HARBOR_OUTPUT, "openai:gpt-4.1-mini").expect("講評処理失敗");
    assert_eq!(outcome.title.as_deref(), Some("Quiet Harbor"));
    assert!(outcome.review.starts_with("The Good:"));

    let parsed = parse_review(&outcome.review);
    assert_eq!(parsed.good, vec!["Strong leading lines"]);
    assert_eq!(parsed.needs_improvement, vec!["Horizon tilts left"]);
    assert_eq!(parsed.technical, vec!["Use f/8"]);
    assert_eq!(parsed.artistic, vec!["Try dawn light"]);
    assert_eq!(parsed.score.as_deref(), Some("7/10"));

    let text = render_review(&parsed);
    assert!(text.contains("  - Horizon tilts left"));
    assert!(text.ends_with("Overall Score: 7/10"));
}

/// Windows改行でも同じ結果になる
#[test]
fn test_crlf_output_matches_lf() {
    let crlf = HARBOR_OUTPUT.replace('\n', "\r\n");
    let split = split_title(&crlf);
    assert_eq!(split.title.as_deref(), Some("Quiet Harbor"));

    let lf = parse_review(&split_title(HARBOR_OUTPUT).body);
    assert_eq!(parse_review(&split.body), lf);
}

/// タイトルなしの出力は本文がそのまま残る
#[test]
fn test_output_without_title() {
    let raw = "The Good:\n- Calm water\nOverall Score: 6.5 / 10";
    let split = split_title(raw);
    assert!(split.title.is_none());
    assert_eq!(split.body, raw);

    let parsed = parse_review(&split.body);
    assert_eq!(parsed.good, vec!["Calm water"]);
    assert_eq!(parsed.score.as_deref(), Some("6.5 / 10"));
}

/// 見出しのない散文は空の結果になる
#[test]
fn test_prose_only_output() {
    let parsed = parse_review("What a lovely image. I enjoyed the colours.");
    assert!(parsed.is_empty());
    for section in Section::ALL {
        assert!(parsed.items(section).is_empty());
    }
    assert!(parsed.score.is_none());

    let text = render_review(&parsed);
    assert!(text.contains("No highlights extracted."));
    assert!(text.ends_with("Overall Score: Not provided"));
}

/// 同じ区分の見出しが二度出た場合は追記される
#[test]
fn test_repeated_heading_appends() {
    let parsed = parse_review("The Good:\n- One\nNeeds Improvement:\n- Two\nThe Good:\n- Three");
    assert_eq!(parsed.good, vec!["One", "Three"]);
    assert_eq!(parsed.needs_improvement, vec!["Two"]);
}

/// プロンプトの書式に従った出力は構造化できる
#[test]
fn test_prompt_and_parser_agree() {
    let exif = ExifSummary {
        camera_model: Some("ILCE-7M3".to_string()),
        iso: Some(100),
        ..Default::default()
    };
    let prompt = build_review_prompt(Some(&exif));
    assert!(prompt.contains("\"cameraModel\":\"ILCE-7M3\""));
    assert_eq!(prompt, build_review_prompt(Some(&exif)));

    // プロンプトの見出しをそのまま使った回答
    let reply = "Title: Test\nThe Good:\n- A\nNeeds Improvement:\n- B\nTechnical Suggestions:\n- C\nArtistic Suggestions:\n- D\nOverall Score: 5/10";
    let outcome = finish_review(reply, "claude-cli").unwrap();
    let parsed = parse_review(&outcome.review);
    for section in Section::ALL {
        assert_eq!(parsed.items(section).len(), 1);
    }
    assert_eq!(parsed.score.as_deref(), Some("5/10"));
}

/// 代表的な講評テキスト（タイトル行付き）をそのまま処理
#[test]
fn test_quiet_harbor_scenario() {
    let raw = "Title: Quiet Harbor\n\
The Good:\n\
- Strong leading lines\n\
- Balanced exposure\n\
Needs Improvement:\n\
- Horizon is tilted\n\
Technical Suggestions:\n\
- Use a faster shutter next time\n\
Artistic Suggestions:\n\
- Try a lower vantage point\n\
Overall Score: 7/10";

    let split = split_title(raw);
    assert_eq!(split.title.as_deref(), Some("Quiet Harbor"));

    let parsed = parse_review(&split.body);
    assert_eq!(parsed.good, vec!["Strong leading lines", "Balanced exposure"]);
    assert_eq!(parsed.needs_improvement, vec!["Horizon is tilted"]);
    assert_eq!(parsed.technical, vec!["Use a faster shutter next time"]);
    assert_eq!(parsed.artistic, vec!["Try a lower vantage point"]);
    assert_eq!(parsed.score.as_deref(), Some("7/10"));
}
