//! レビューの型定義
//!
//! CLIと履歴ストアで共有される型:
//! - ExifSummary: プロンプトに埋め込むカメラ情報
//! - ParsedReview: モデル出力をパースした構造化レビュー
//! - TitledReview: タイトル行を分離したモデル出力

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// カメラ情報（EXIFサマリ）
///
/// すべて任意項目。JSONに出すときは未設定の項目を省略する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExifSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length_mm: Option<f64>,
    #[serde(rename = "focalLength35mm", skip_serializing_if = "Option::is_none")]
    pub focal_length_35mm: Option<f64>,
    /// F値
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f64>,
    /// "1/250s" や "2.00s" 形式
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_compensation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
    /// 撮影日時（ISO-8601）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,
}

impl ExifSummary {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSONファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 値を1つも持たない場合true（空文字は値なしとみなす）
    pub fn is_empty(&self) -> bool {
        let has_text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());

        !(has_text(&self.camera_make)
            || has_text(&self.camera_model)
            || has_text(&self.lens_model)
            || self.focal_length_mm.is_some()
            || self.focal_length_35mm.is_some()
            || self.aperture.is_some()
            || has_text(&self.shutter_speed)
            || self.iso.is_some()
            || self.exposure_compensation.is_some()
            || has_text(&self.white_balance)
            || has_text(&self.flash)
            || has_text(&self.taken_at))
    }

    /// 空のサマリをNoneに畳む
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// レビューのセクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Good,
    NeedsImprovement,
    Technical,
    Artistic,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Good,
        Section::NeedsImprovement,
        Section::Technical,
        Section::Artistic,
    ];
}

/// 構造化レビュー
///
/// リストは出現順。見出しがなければ空のまま（Noneにはならない）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedReview {
    pub good: Vec<String>,
    pub needs_improvement: Vec<String>,
    pub technical: Vec<String>,
    pub artistic: Vec<String>,
    /// 通常 "N/10"。空文字にはならない
    pub score: Option<String>,
}

impl ParsedReview {
    pub fn items(&self, section: Section) -> &[String] {
        match section {
            Section::Good => &self.good,
            Section::NeedsImprovement => &self.needs_improvement,
            Section::Technical => &self.technical,
            Section::Artistic => &self.artistic,
        }
    }

    pub(crate) fn items_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Good => &mut self.good,
            Section::NeedsImprovement => &mut self.needs_improvement,
            Section::Technical => &mut self.technical,
            Section::Artistic => &mut self.artistic,
        }
    }

    /// 何も抽出できなかった場合true
    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.items(*s).is_empty()) && self.score.is_none()
    }
}

/// タイトル行を分離したモデル出力
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledReview {
    pub title: Option<String>,
    pub body: String,
}
