//! モデル出力パーサー
//!
//! 講評テキスト（半構造化の自然文）から
//! タイトル・4区分の箇条書き・総合スコアを取り出す。
//!
//! どちらの関数もエラーを返さない。崩れた出力は空のリスト・Noneに落とす。

use crate::prompts::{SCORE_HEADING, SECTION_HEADINGS, TITLE_HEADING};
use crate::types::{ParsedReview, Section, TitledReview};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE_RE: Regex =
        Regex::new(&format!(r"(?i)^{}\s*:", regex::escape(&heading_prefix(TITLE_HEADING)))).unwrap();
    /// 数字はASCIIのみ（全角・アラビア数字はスコアとして扱わない）
    static ref SCORE_RE: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?\s*/\s*10").unwrap();
    static ref SCORE_PREFIX_RE: Regex =
        Regex::new(&format!(r"(?i)^{}\s*:?", regex::escape(SCORE_PREFIX.as_str()))).unwrap();

    /// 見出しの接頭辞（小文字）。先に一致したものを採用する
    static ref SECTION_PREFIXES: Vec<(String, Section)> = SECTION_HEADINGS
        .iter()
        .map(|(heading, section)| (heading_prefix(heading), *section))
        .collect();
    static ref SCORE_PREFIX: String = heading_prefix(SCORE_HEADING);
}

const BULLET_MARKERS: [char; 3] = ['-', '•', '*'];

/// "The Good:" → "the good"
fn heading_prefix(heading: &str) -> String {
    heading.trim_end_matches(':').trim().to_lowercase()
}

/// 前後の空白とBOMを除く
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// 改行コードを "\n" に統一
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// 先頭の "Title:" 行を分離
///
/// 最初の空でない行が `title:`（大文字小文字不問）で始まる場合のみタイトルとして扱う。
/// タイトル行以外の行（空行を含む）は順序を保って本文に残す。
///
/// # Examples
/// ```
/// use photo_critique_common::split_title;
///
/// let split = split_title("Title: Sunset Ridge\nThe Good:\n- Warm light");
/// assert_eq!(split.title.as_deref(), Some("Sunset Ridge"));
/// assert_eq!(split.body, "The Good:\n- Warm light");
/// ```
pub fn split_title(text: &str) -> TitledReview {
    let normalized = normalize_newlines(text);
    let lines: Vec<&str> = normalized.split('\n').collect();

    let title_index = lines.iter().position(|line| !trim_line(line).is_empty());
    let title_index = match title_index {
        Some(i) if TITLE_RE.is_match(trim_line(lines[i])) => i,
        _ => {
            return TitledReview {
                title: None,
                body: text.to_string(),
            }
        }
    };

    let title = TITLE_RE.replace(trim_line(lines[title_index]), "").trim().to_string();
    let body = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != title_index)
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    TitledReview {
        title: if title.is_empty() { None } else { Some(title) },
        body,
    }
}

/// 見出し判定の結果
enum Heading {
    Section(Section),
    Score,
}

fn match_heading(line: &str) -> Option<Heading> {
    let lower = line.to_lowercase();

    SECTION_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix.as_str()))
        .map(|(_, section)| Heading::Section(*section))
        .or_else(|| lower.starts_with(SCORE_PREFIX.as_str()).then_some(Heading::Score))
}

/// "Overall Score" 行からスコアを取り出す
///
/// `N/10` 形式があればその部分だけ、なければ見出しを除いた残り。
/// 残りが空ならNone
pub fn extract_score(line: &str) -> Option<String> {
    if let Some(m) = SCORE_RE.find(line) {
        return Some(m.as_str().to_string());
    }

    let rest = SCORE_PREFIX_RE.replace(line, "");
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// 行頭の箇条書き記号を1つだけ外す
pub fn strip_bullet(line: &str) -> &str {
    match line.strip_prefix(&BULLET_MARKERS[..]) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// 講評本文をパース
///
/// 1行ずつ前から走査し、見出しで現在のセクションを切り替える。
/// - 空行は無視（セクションは継続）
/// - 最初の見出しより前の行は捨てる
/// - "Overall Score" 行でスコアを取り、セクションを閉じる
///
/// # Examples
/// ```
/// use photo_critique_common::parse_review;
///
/// let parsed = parse_review("The Good:\n- Nice light\n\n- Good crop\nOverall Score: 8/10");
/// assert_eq!(parsed.good, vec!["Nice light", "Good crop"]);
/// assert_eq!(parsed.score.as_deref(), Some("8/10"));
/// ```
pub fn parse_review(text: &str) -> ParsedReview {
    let mut review = ParsedReview::default();
    let mut current: Option<Section> = None;

    let normalized = normalize_newlines(text);

    for line in normalized.split('\n').map(trim_line) {
        if line.is_empty() {
            continue;
        }

        match match_heading(line) {
            Some(Heading::Section(section)) => {
                current = Some(section);
            }
            Some(Heading::Score) => {
                review.score = extract_score(line);
                current = None;
            }
            None => {
                if let Some(section) = current {
                    let cleaned = strip_bullet(line);
                    if !cleaned.is_empty() {
                        review.items_mut(section).push(cleaned.to_string());
                    }
                }
            }
        }
    }

    review
}
