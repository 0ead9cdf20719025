//! プロンプト生成モジュール
//!
//! CLIとテストで共有されるプロンプト生成ロジック:
//! - 見出し定数: パーサーが前提とする見出し文字列
//! - build_review_prompt: 写真講評用プロンプト
//!
//! パーサーは SECTION_HEADINGS / TITLE_HEADING / SCORE_HEADING から判定用の接頭辞を作る。

use crate::types::{ExifSummary, Section};

pub const TITLE_HEADING: &str = "Title:";
pub const GOOD_HEADING: &str = "The Good:";
pub const NEEDS_IMPROVEMENT_HEADING: &str = "Needs Improvement:";
pub const TECHNICAL_HEADING: &str = "Technical Suggestions:";
pub const ARTISTIC_HEADING: &str = "Artistic Suggestions:";
pub const SCORE_HEADING: &str = "Overall Score:";

/// セクション見出しと区分の対応（パーサーはこの順で判定する）
pub const SECTION_HEADINGS: [(&str, Section); 4] = [
    (GOOD_HEADING, Section::Good),
    (NEEDS_IMPROVEMENT_HEADING, Section::NeedsImprovement),
    (TECHNICAL_HEADING, Section::Technical),
    (ARTISTIC_HEADING, Section::Artistic),
];

/// 出力で要求する見出し（この順で並べる）
pub const REVIEW_HEADINGS: [&str; 6] = [
    TITLE_HEADING,
    GOOD_HEADING,
    NEEDS_IMPROVEMENT_HEADING,
    TECHNICAL_HEADING,
    ARTISTIC_HEADING,
    SCORE_HEADING,
];

const PERSONA: &str =
    "You are a photography coach. The user is providing a photo for learning the skill of photography";

const COACHING_GUIDANCE: &[&str] = &[
    "Be positive but not flattering. Be direct and specific about weaknesses. Avoid simply describing the photo.",
    "Focus on actionable technical adjustments (exposure triangle, focus mode, metering, white balance, stabilization, etc).",
    "Avoid suggestions that require changing the scene or subjects. Assume the photo is reviewed after the fact.",
    "When you mention a problem, pair it with a concrete setting adjustment or technique to address it next time.",
    "Examples of actionable fixes:",
    "- If the subject is blurred from motion, recommend a faster shutter speed (and suggest opening aperture or raising ISO to keep exposure).",
    "- If the image is noisy from high ISO, suggest lowering ISO and compensating with a wider aperture or slower shutter speed (if stability allows).",
    "- If depth of field is too shallow, suggest stopping down the aperture (and adjust shutter/ISO to keep exposure).",
    "- If highlights are blown, suggest using a faster shutter speed or lower ISO, or dialing negative exposure compensation.",
    "- If camera shake is visible, suggest a faster shutter speed, stabilization, or a tripod; consider the 1/focal-length rule as a minimum.",
];

const SCORE_CALIBRATION: &[&str] = &[
    "Score calibration guide:",
    "- 9–10: exceptional, award‑caliber or portfolio‑grade.",
    "- 7–8: strong image with clear intent and solid execution.",
    "- 5–6: average/casual result with noticeable flaws.",
    "- 3–4: weak execution; multiple technical/compositional issues.",
    "- 1–2: severely flawed or unusable.",
    "Use the calibration to avoid under‑scoring truly excellent work.",
    "Do not default to 6/10. If the photo is strong with only minor issues, score 8–10.",
    "Reserve 5–6 for clearly average snapshots with notable issues.",
    "Weigh the severity of the weaknesses: if fundamentals (composition, lighting, color, subject) are strong, score higher even with minor issues; if fundamentals are weak, lower the score accordingly.",
];

/// EXIFサマリ行を生成
///
/// 値を持たないサマリは未指定と同じ扱い
pub fn exif_summary_line(exif: Option<&ExifSummary>) -> String {
    match exif.filter(|e| !e.is_empty()) {
        Some(exif) => {
            // Option<String>/f64/u32 のみなのでシリアライズは失敗しない
            let json = serde_json::to_string(exif).unwrap_or_else(|_| "{}".to_string());
            format!("EXIF metadata: {}", json)
        }
        None => "EXIF metadata: none provided.".to_string(),
    }
}

/// 写真講評プロンプト生成
///
/// # Arguments
/// * `exif` - カメラ情報（なければNone）
///
/// # Returns
/// 改行区切りの指示文。見出しは1行ずつ固定順で並ぶ
pub fn build_review_prompt(exif: Option<&ExifSummary>) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(32);

    lines.push(PERSONA.to_string());
    lines.push(exif_summary_line(exif));
    lines.extend(COACHING_GUIDANCE.iter().map(|s| s.to_string()));
    lines.extend(SCORE_CALIBRATION.iter().map(|s| s.to_string()));
    lines.push("Return a structured critique with these headings exactly:".to_string());
    lines.push(format!("{} (a short descriptive title for the image)", TITLE_HEADING));
    lines.push(format!("{} (bullet points)", GOOD_HEADING));
    lines.push(format!("{} (bullet points, be objective)", NEEDS_IMPROVEMENT_HEADING));
    lines.push(format!("{} (bullet points, camera settings or mechanics)", TECHNICAL_HEADING));
    lines.push(format!("{} (bullet points, more creative/subjective)", ARTISTIC_HEADING));
    lines.push(format!("{} x/10 (single line)", SCORE_HEADING));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_review;

    fn sample_exif() -> ExifSummary {
        ExifSummary {
            camera_make: Some("Sony".to_string()),
            camera_model: Some("ILCE-7M3".to_string()),
            aperture: Some(4.0),
            iso: Some(100),
            ..Default::default()
        }
    }

    // =============================================
    // exif_summary_line テスト
    // =============================================

    #[test]
    fn test_exif_line_none() {
        assert_eq!(exif_summary_line(None), "EXIF metadata: none provided.");
    }

    #[test]
    fn test_exif_line_empty_summary_treated_as_none() {
        let exif = ExifSummary::default();
        assert_eq!(exif_summary_line(Some(&exif)), "EXIF metadata: none provided.");
    }

    #[test]
    fn test_exif_line_json() {
        let line = exif_summary_line(Some(&sample_exif()));
        assert_eq!(
            line,
            r#"EXIF metadata: {"cameraMake":"Sony","cameraModel":"ILCE-7M3","aperture":4.0,"iso":100}"#
        );
    }

    // =============================================
    // build_review_prompt テスト
    // =============================================

    #[test]
    fn test_prompt_is_deterministic() {
        let exif = sample_exif();
        assert_eq!(build_review_prompt(Some(&exif)), build_review_prompt(Some(&exif)));
        assert_eq!(build_review_prompt(None), build_review_prompt(None));
    }

    #[test]
    fn test_prompt_second_line_is_exif() {
        let prompt = build_review_prompt(None);
        let lines: Vec<&str> = prompt.lines().collect();
        assert!(lines[0].starts_with("You are a photography coach"));
        assert_eq!(lines[1], "EXIF metadata: none provided.");
    }

    #[test]
    fn test_prompt_headings_in_order_on_own_lines() {
        let prompt = build_review_prompt(Some(&sample_exif()));
        let positions: Vec<usize> = REVIEW_HEADINGS
            .iter()
            .map(|heading| {
                prompt
                    .lines()
                    .position(|line| line.starts_with(heading))
                    .unwrap_or_else(|| panic!("見出しがない: {}", heading))
            })
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
        assert!(prompt.ends_with("Overall Score: x/10 (single line)"));
    }

    #[test]
    fn test_prompt_contains_calibration() {
        let prompt = build_review_prompt(None);
        assert!(prompt.contains("Score calibration guide:"));
        assert!(prompt.contains("Do not default to 6/10."));
    }

    #[test]
    fn test_prompt_headings_are_recognized_by_parser() {
        // 見出し行はパーサー側で見出しとして消費され、本文にならない
        let prompt = build_review_prompt(None);
        let heading_block: String = prompt
            .lines()
            .skip_while(|line| !line.starts_with(GOOD_HEADING))
            .collect::<Vec<_>>()
            .join("\n");

        let parsed = parse_review(&heading_block);
        assert!(parsed.good.is_empty());
        assert!(parsed.needs_improvement.is_empty());
        assert!(parsed.technical.is_empty());
        assert!(parsed.artistic.is_empty());
        assert_eq!(parsed.score.as_deref(), Some("x/10 (single line)"));
    }
}
