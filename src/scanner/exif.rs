//! EXIF読み取り
//!
//! 写真のEXIFからプロンプト用の ExifSummary を組み立てる。
//! 読めない・値がない場合はNone。

use exif::{Exif, In, Reader, Tag, Value};
use photo_critique_common::ExifSummary;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn extract_exif_summary(path: &Path) -> Option<ExifSummary> {
    let exif = match read_exif(path) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "EXIFを読み取れません");
            return None;
        }
    };

    let summary = ExifSummary {
        camera_make: ascii_field(&exif, Tag::Make),
        camera_model: ascii_field(&exif, Tag::Model),
        lens_model: ascii_field(&exif, Tag::LensModel),
        focal_length_mm: float_field(&exif, Tag::FocalLength).map(|v| round_to(v, 1)),
        focal_length_35mm: uint_field(&exif, Tag::FocalLengthIn35mmFilm)
            .map(|v| round_to(v as f64, 1)),
        aperture: aperture(&exif),
        shutter_speed: float_field(&exif, Tag::ExposureTime).and_then(shutter_speed_label),
        iso: uint_field(&exif, Tag::PhotographicSensitivity),
        exposure_compensation: float_field(&exif, Tag::ExposureBiasValue).map(|v| round_to(v, 2)),
        white_balance: uint_field(&exif, Tag::WhiteBalance).and_then(white_balance_label),
        flash: uint_field(&exif, Tag::Flash).map(flash_label),
        taken_at: taken_at(&exif),
    };

    summary.non_empty()
}

fn read_exif(path: &Path) -> Result<Exif, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    Ok(Reader::new().read_from_container(&mut bufreader)?)
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref parts) => {
            let text = parts
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).trim_matches(char::from(0)).trim().to_string())?;
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

fn uint_field(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}

fn float_field(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let value = match field.value {
        Value::Rational(ref v) => v.first().map(|r| r.to_f64()),
        Value::SRational(ref v) => v.first().map(|r| r.to_f64()),
        _ => field.value.get_uint(0).map(f64::from),
    }?;
    value.is_finite().then_some(value)
}

/// F値（FNumberがなければApertureValue(APEX)から換算）
fn aperture(exif: &Exif) -> Option<f64> {
    float_field(exif, Tag::FNumber)
        .or_else(|| float_field(exif, Tag::ApertureValue).map(|av| 2f64.powf(av / 2.0)))
        .map(|f| round_to(f, 1))
}

fn taken_at(exif: &Exif) -> Option<String> {
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let bytes = match field.value {
        Value::Ascii(ref parts) => parts.first()?,
        _ => return None,
    };
    let dt = exif::DateTime::from_ascii(bytes).ok()?;
    let date = chrono::NaiveDate::from_ymd_opt(dt.year as i32, dt.month as u32, dt.day as u32)?;
    let datetime = date.and_hms_opt(dt.hour as u32, dt.minute as u32, dt.second as u32)?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
}

pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// 露光時間を "1/250s" / "2.00s" 形式に
pub(crate) fn shutter_speed_label(seconds: f64) -> Option<String> {
    if seconds <= 0.0 || !seconds.is_finite() {
        return None;
    }
    if seconds >= 1.0 {
        Some(format!("{:.2}s", seconds))
    } else {
        Some(format!("1/{}s", (1.0 / seconds).round() as u64))
    }
}

pub(crate) fn white_balance_label(value: u32) -> Option<String> {
    match value {
        0 => Some("Auto".to_string()),
        1 => Some("Manual".to_string()),
        _ => None,
    }
}

pub(crate) fn flash_label(value: u32) -> String {
    if value == 0 {
        "No flash".to_string()
    } else {
        "Flash fired".to_string()
    }
}
