//! 不具合カタログとフィードバックの型定義
//!
//! CLIとテストで共有される型:
//! - DefectRecord: カタログの1行
//! - Catalog: カタログ全体 + 改訂マーカー
//! - FeedbackEntry: フィードバックログの1行

use serde::{Deserialize, Serialize};

/// 改訂マーカーが取得できない場合の表示
pub const UNKNOWN_REVISION: &str = "Unknown";

/// セットアップ番号が未入力の場合の代替値
pub const NOT_AVAILABLE: &str = "N/A";

/// 不具合の発生頻度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    High,
    Medium,
    Low,
    /// 未知の値・空欄（元の文字列を保持）
    Other(String),
}

impl Frequency {
    /// 表の値から頻度を判定（前後空白・大文字小文字を無視）
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => Frequency::High,
            "medium" => Frequency::Medium,
            "low" => Frequency::Low,
            _ => Frequency::Other(raw.trim().to_string()),
        }
    }

    /// 並び替え用のランク: High(3) > Medium(2) > Low(1) > その他(0)
    pub fn rank(&self) -> u8 {
        match self {
            Frequency::High => 3,
            Frequency::Medium => 2,
            Frequency::Low => 1,
            Frequency::Other(_) => 0,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::High => write!(f, "High"),
            Frequency::Medium => write!(f, "Medium"),
            Frequency::Low => write!(f, "Low"),
            Frequency::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// カタログの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectRecord {
    /// 表に書かれたままのセットアップ番号（前後空白のみ除去）
    pub setup_id: String,
    pub defect_name: String,
    pub frequency: Frequency,
    pub preventative_suggestion: String,
}

/// 読み込み済みの不具合カタログ
///
/// リクエストごとに読み直す。読み込み後は変更しない。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub records: Vec<DefectRecord>,
    /// 最終更新日などの自由形式マーカー
    pub revision: String,
}

impl Catalog {
    pub fn new(records: Vec<DefectRecord>, revision: Option<String>) -> Self {
        let revision = revision
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| UNKNOWN_REVISION.to_string());
        Self { records, revision }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// フィードバックログの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub setup_id: String,
    pub operator: String,
    pub feedback: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

/// フィードバックログの列構成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLayout {
    /// Setup Number, Operator, Feedback, Date
    #[default]
    Full,
    /// Timestamp, Feedback
    TextOnly,
}

impl LogLayout {
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            LogLayout::Full => &["Setup Number", "Operator", "Feedback", "Date"],
            LogLayout::TextOnly => &["Timestamp", "Feedback"],
        }
    }
}

impl std::str::FromStr for LogLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogLayout::Full),
            "text-only" | "text" => Ok(LogLayout::TextOnly),
            _ => Err(format!("Unknown layout: {}. Use full or text-only", s)),
        }
    }
}

impl std::fmt::Display for LogLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLayout::Full => write!(f, "full"),
            LogLayout::TextOnly => write!(f, "text-only"),
        }
    }
}
