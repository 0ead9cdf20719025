//! テキスト表示
//!
//! 構造化レビューとEXIFを端末向けのプレーンテキストにする。

use crate::history::ReviewEntry;
use photo_critique_common::{ExifSummary, ParsedReview, Section};
use serde_json::json;
use std::fmt::Write;

fn section_heading(section: Section) -> &'static str {
    match section {
        Section::Good => "The Good",
        Section::NeedsImprovement => "Needs Improvement",
        Section::Technical => "Technical Suggestions",
        Section::Artistic => "Artistic Suggestions",
    }
}

fn empty_placeholder(section: Section) -> &'static str {
    match section {
        Section::Good => "No highlights extracted.",
        Section::NeedsImprovement => "No issues extracted.",
        Section::Technical => "No technical suggestions extracted.",
        Section::Artistic => "No suggestions extracted.",
    }
}

pub fn render_review(review: &ParsedReview) -> String {
    let mut out = String::new();

    for section in Section::ALL {
        let _ = writeln!(out, "{}", section_heading(section));
        let items = review.items(section);
        if items.is_empty() {
            let _ = writeln!(out, "  {}", empty_placeholder(section));
        } else {
            for item in items {
                let _ = writeln!(out, "  - {}", item);
            }
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "Overall Score: {}",
        review.score.as_deref().unwrap_or("Not provided")
    );
    out
}

pub fn exif_entries(exif: &ExifSummary) -> Vec<(&'static str, String)> {
    let camera = [exif.camera_make.as_deref(), exif.camera_model.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let entries: [(&'static str, Option<String>); 11] = [
        ("Camera", Some(camera)),
        ("Lens", exif.lens_model.clone()),
        ("Focal Length", exif.focal_length_mm.map(|v| format!("{}mm", v))),
        ("Focal Length (35mm)", exif.focal_length_35mm.map(|v| format!("{}mm", v))),
        ("Aperture", exif.aperture.map(|v| format!("f/{}", v))),
        ("Shutter", exif.shutter_speed.clone()),
        ("ISO", exif.iso.map(|v| v.to_string())),
        ("Exposure Comp", exif.exposure_compensation.map(|v| v.to_string())),
        ("White Balance", exif.white_balance.clone()),
        ("Flash", exif.flash.clone()),
        ("Taken At", exif.taken_at.clone()),
    ];

    entries
        .into_iter()
        .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| (label, v)))
        .collect()
}

pub fn render_exif(exif: Option<&ExifSummary>) -> String {
    let entries = exif.map(exif_entries).unwrap_or_default();
    if entries.is_empty() {
        return "No EXIF metadata detected.".to_string();
    }

    let width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(label, value)| format!("{:<width$}  {}", label, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 履歴エントリ1件の詳細表示
pub fn render_entry(entry: &ReviewEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", entry.display_title());
    let _ = writeln!(
        out,
        "{} | {} | {}",
        entry.id,
        entry.created_at.format("%Y-%m-%d %H:%M"),
        entry.model
    );
    let _ = writeln!(out, "{}\n", entry.file_path);
    let _ = writeln!(out, "{}\n", render_exif(entry.exif.as_ref()));
    out.push_str(&render_review(&entry.parsed()));
    out
}

/// 履歴一覧の1行
pub fn render_entry_line(entry: &ReviewEntry) -> String {
    let score = entry.parsed().score.unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {}  {:<8}  {}",
        entry.id,
        entry.created_at.format("%Y-%m-%d %H:%M"),
        score,
        entry.display_title()
    )
}

/// JSON出力用（--json）
pub fn entry_json(entry: &ReviewEntry) -> serde_json::Value {
    json!({
        "id": entry.id,
        "title": entry.display_title(),
        "fileName": entry.file_name,
        "createdAt": entry.created_at,
        "model": entry.model,
        "exif": entry.exif,
        "review": entry.parsed(),
        "reviewText": entry.review_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_review_with_items() {
        let review = ParsedReview {
            good: vec!["Strong leading lines".to_string()],
            score: Some("7/10".to_string()),
            ..Default::default()
        };

        let text = render_review(&review);
        assert!(text.contains("The Good\n  - Strong leading lines"));
        assert!(text.contains("Needs Improvement\n  No issues extracted."));
        assert!(text.contains("Technical Suggestions\n  No technical suggestions extracted."));
        assert!(text.contains("Artistic Suggestions\n  No suggestions extracted."));
        assert!(text.ends_with("Overall Score: 7/10"));
    }

    #[test]
    fn test_render_review_without_score() {
        let text = render_review(&ParsedReview::default());
        assert!(text.contains("No highlights extracted."));
        assert!(text.ends_with("Overall Score: Not provided"));
    }

    #[test]
    fn test_render_exif_none() {
        assert_eq!(render_exif(None), "No EXIF metadata detected.");
        assert_eq!(render_exif(Some(&ExifSummary::default())), "No EXIF metadata detected.");
    }

    #[test]
    fn test_exif_entries_formatting() {
        let exif = ExifSummary {
            camera_make: Some("Nikon".to_string()),
            camera_model: Some("Z6".to_string()),
            focal_length_mm: Some(50.0),
            aperture: Some(1.8),
            iso: Some(800),
            exposure_compensation: Some(-0.33),
            ..Default::default()
        };

        let entries = exif_entries(&exif);
        assert_eq!(
            entries,
            vec![
                ("Camera", "Nikon Z6".to_string()),
                ("Focal Length", "50mm".to_string()),
                ("Aperture", "f/1.8".to_string()),
                ("ISO", "800".to_string()),
                ("Exposure Comp", "-0.33".to_string()),
            ]
        );
    }

    #[test]
    fn test_exif_entries_model_only_camera() {
        let exif = ExifSummary {
            camera_model: Some("X100V".to_string()),
            ..Default::default()
        };
        assert_eq!(exif_entries(&exif), vec![("Camera", "X100V".to_string())]);
    }
}
