//! 講評履歴モジュール
//!
//! 講評結果をローカルのJSONファイルに保存する。
//! 写真のSHA-256をキーにして、同じ写真の再講評をスキップできる。

use crate::config::Config;
use crate::error::Result;
use crate::reviewer::ReviewOutcome;
use crate::scanner::PhotoData;
use chrono::{DateTime, Duration, Utc};
use photo_critique_common::{parse_review, ExifSummary, ParsedReview};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const HISTORY_FILE_NAME: &str = "history.json";
const ID_LEN: usize = 16;

/// 履歴エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub id: String,
    /// 写真のSHA-256（hex）
    pub file_hash: String,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub file_size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub exif: Option<ExifSummary>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// AIが付けたタイトル
    #[serde(default)]
    pub title: Option<String>,
    /// タイトル行を除いた講評本文（生テキスト）
    pub review_text: String,
    pub model: String,
}

impl ReviewEntry {
    pub fn new(photo: &PhotoData, file_hash: String, outcome: ReviewOutcome, now: DateTime<Utc>) -> Self {
        let id = new_review_id(&file_hash, now);
        Self {
            id,
            file_hash,
            file_name: photo.info.file_name.clone(),
            file_path: photo.info.path.display().to_string(),
            mime_type: photo.info.mime_type.to_string(),
            file_size: photo.info.file_size,
            width: photo.dimensions.map(|(w, _)| w),
            height: photo.dimensions.map(|(_, h)| h),
            exif: photo.info.exif.clone(),
            created_at: now,
            updated_at: None,
            title: outcome.title,
            review_text: outcome.review,
            model: outcome.model,
        }
    }

    /// 表示用タイトル（AIタイトル → ファイル名 → 既定値）
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.file_name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or("Uploaded photo")
    }

    pub fn parsed(&self) -> ParsedReview {
        parse_review(&self.review_text)
    }

    /// 講評を作り直した結果で上書き
    pub fn apply_outcome(&mut self, outcome: ReviewOutcome, now: DateTime<Utc>) {
        self.title = outcome.title;
        self.review_text = outcome.review;
        self.model = outcome.model;
        self.updated_at = Some(now);
    }
}

/// 履歴ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewHistory {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: Vec<ReviewEntry>,
}

impl Default for ReviewHistory {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: Vec::new(),
        }
    }
}

impl ReviewHistory {
    const CURRENT_VERSION: u32 = 1;

    /// 既定の履歴ファイルパス
    pub fn default_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join(HISTORY_FILE_NAME))
    }

    /// 履歴ファイルを読み込み（なければ・壊れていれば空）
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "履歴ファイルを開けません");
                return Self::default();
            }
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, ReviewHistory>(reader) {
            Ok(history) if history.version == Self::CURRENT_VERSION => history,
            Ok(history) => {
                tracing::warn!(found = history.version, "履歴バージョン不一致、空の履歴を使います");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "履歴ファイルが壊れています");
                Self::default()
            }
        }
    }

    /// 履歴ファイルを保存
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// 履歴ファイルを削除（存在しなければfalse）
    pub fn clear(path: &Path) -> Result<bool> {
        if path.exists() {
            std::fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn insert(&mut self, entry: ReviewEntry) {
        self.entries.push(entry);
    }

    /// 同じ写真の最新エントリ
    pub fn find_by_hash(&self, file_hash: &str) -> Option<&ReviewEntry> {
        self.entries
            .iter()
            .filter(|e| e.file_hash == file_hash)
            .max_by_key(|e| e.created_at)
    }

    pub fn find_by_hash_mut(&mut self, file_hash: &str) -> Option<&mut ReviewEntry> {
        self.entries
            .iter_mut()
            .filter(|e| e.file_hash == file_hash)
            .max_by_key(|e| e.created_at)
    }

    /// IDで検索（一意な先頭一致も可）
    pub fn get(&self, id: &str) -> Option<&ReviewEntry> {
        if let Some(entry) = self.entries.iter().find(|e| e.id == id) {
            return Some(entry);
        }
        if id.is_empty() {
            return None;
        }

        let mut matches = self.entries.iter().filter(|e| e.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Some(entry),
            _ => None,
        }
    }

    /// 新しい順に最大limit件
    pub fn recent(&self, limit: usize) -> Vec<&ReviewEntry> {
        let mut entries: Vec<&ReviewEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        entries
    }

    /// 保持期間を過ぎたエントリを削除し、削除件数を返す
    ///
    /// 日数が大きすぎて基準日時を計算できない場合は何も削除しない
    pub fn prune_older_than(&mut self, days: u64, now: DateTime<Utc>) -> usize {
        let cutoff = i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .and_then(|period| now.checked_sub_signed(period));
        let Some(cutoff) = cutoff else {
            tracing::warn!(days, "保持日数が範囲外のため削除しません");
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|e| e.created_at >= cutoff);
        before - self.entries.len()
    }

    /// 履歴件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 写真内容のハッシュ（SHA-256 hex）
pub fn compute_file_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn new_review_id(file_hash: &str, now: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_hash.as_bytes());
    hasher.update(now.to_rfc3339().as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ID_LEN);
    id
}
