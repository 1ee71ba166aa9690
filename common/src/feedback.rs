//! フィードバックログのモデル
//!
//! 入力の検証、タイムスタンプ付与、列構成ごとの行変換を行う。
//! 永続化（ローカル/リモート）はCLI側のストアが担当する。

use crate::error::{Error, Result};
use crate::types::{FeedbackEntry, LogLayout, NOT_AVAILABLE};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// タイムスタンプ書式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 画面から受け取った未確定のフィードバック
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub setup_id: String,
    pub operator: String,
    pub feedback: String,
}

impl FeedbackDraft {
    pub fn new(setup_id: impl Into<String>, operator: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            setup_id: setup_id.into(),
            operator: operator.into(),
            feedback: feedback.into(),
        }
    }

    /// 検証してタイムスタンプを付与する
    ///
    /// セットアップ番号が空なら `N/A` を入れる。
    pub fn into_entry(self, timestamp: String) -> Result<FeedbackEntry> {
        let operator = self.operator.trim();
        if operator.is_empty() {
            return Err(Error::Validation("operator name is required".into()));
        }
        let feedback = self.feedback.trim();
        if feedback.is_empty() {
            return Err(Error::Validation("feedback text is required".into()));
        }
        let setup_id = match self.setup_id.trim() {
            "" => NOT_AVAILABLE.to_string(),
            s => s.to_string(),
        };

        Ok(FeedbackEntry {
            setup_id,
            operator: operator.to_string(),
            feedback: feedback.to_string(),
            timestamp,
        })
    }
}

/// 提出時刻の文字列を作る
///
/// `offset` 指定時はそのUTCオフセット、なければローカル時刻。
pub fn capture_timestamp(offset: Option<FixedOffset>) -> String {
    match offset {
        Some(offset) => format_timestamp(&Utc::now().with_timezone(&offset)),
        None => format_timestamp(&Local::now()),
    }
}

pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// `YYYY-MM-DD HH:MM:SS` 形式かどうか
pub fn is_valid_timestamp(s: &str) -> bool {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).is_ok()
}

/// UTCオフセット文字列（`+09:00` など）を解釈
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset> {
    s.trim()
        .parse::<FixedOffset>()
        .map_err(|e| Error::Config(format!("invalid UTC offset '{}': {}", s, e)))
}

/// フィードバックログ全体（追記のみ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackLog {
    entries: Vec<FeedbackEntry>,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: FeedbackEntry) {
        self.entries.push(entry);
    }

    /// 行×セルから復元（先頭行はヘッダー）
    ///
    /// ヘッダーが `layout` の列構成と一致しなければ `Parse` エラー。
    /// 末尾の空セルは無視する。
    pub fn from_rows(rows: &[Vec<String>], layout: LogLayout) -> Result<Self> {
        let Some((header, body)) = rows.split_first() else {
            return Ok(Self::new());
        };

        let mut names: Vec<&str> = header.iter().map(|h| h.trim()).collect();
        while names.last() == Some(&"") {
            names.pop();
        }
        let expected = layout.headers();
        if names.as_slice() != expected {
            return Err(Error::Parse(format!(
                "log header [{}] does not match {} layout [{}]",
                names.join(", "),
                layout,
                expected.join(", ")
            )));
        }

        let cell = |row: &Vec<String>, i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        let entries = body
            .iter()
            .map(|row| match layout {
                LogLayout::Full => FeedbackEntry {
                    setup_id: cell(row, 0),
                    operator: cell(row, 1),
                    feedback: cell(row, 2),
                    timestamp: cell(row, 3),
                },
                LogLayout::TextOnly => FeedbackEntry {
                    setup_id: NOT_AVAILABLE.to_string(),
                    operator: NOT_AVAILABLE.to_string(),
                    timestamp: cell(row, 0),
                    feedback: cell(row, 1),
                },
            })
            .collect();

        Ok(Self { entries })
    }

    /// ヘッダー付きの行×セルに変換
    pub fn to_rows(&self, layout: LogLayout) -> Vec<Vec<String>> {
        let mut rows = vec![layout.headers().iter().map(|h| h.to_string()).collect()];
        rows.extend(self.entries.iter().map(|e| match layout {
            LogLayout::Full => vec![
                e.setup_id.clone(),
                e.operator.clone(),
                e.feedback.clone(),
                e.timestamp.clone(),
            ],
            LogLayout::TextOnly => vec![e.timestamp.clone(), e.feedback.clone()],
        }));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(setup: &str, text: &str) -> FeedbackEntry {
        FeedbackDraft::new(setup, "Jo", text)
            .into_entry("2026-01-18 09:30:00".to_string())
            .unwrap()
    }

    #[test]
    fn test_draft_trims_fields() {
        let e = FeedbackDraft::new(" S1 ", "  Jo ", " loose bolt\n")
            .into_entry("2026-01-18 09:30:00".into())
            .unwrap();
        assert_eq!(e.setup_id, "S1");
        assert_eq!(e.operator, "Jo");
        assert_eq!(e.feedback, "loose bolt");
    }

    #[test]
    fn test_draft_blank_setup_becomes_sentinel() {
        let e = entry("   ", "note");
        assert_eq!(e.setup_id, NOT_AVAILABLE);
    }

    #[test]
    fn test_draft_requires_operator_and_text() {
        let err = FeedbackDraft::new("S1", " ", "text").into_entry(String::new());
        assert!(matches!(err, Err(Error::Validation(_))));

        let err = FeedbackDraft::new("S1", "Jo", "\t").into_entry(String::new());
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn test_capture_timestamp_format() {
        assert!(is_valid_timestamp(&capture_timestamp(None)));
        let jst = parse_utc_offset("+09:00").unwrap();
        let ts = capture_timestamp(Some(jst));
        assert!(is_valid_timestamp(&ts));
        assert_eq!(ts.len(), 19);
    }

    #[test]
    fn test_format_timestamp_with_offset() {
        let utc = Utc.with_ymd_and_hms(2026, 1, 18, 0, 5, 9).unwrap();
        let jst = parse_utc_offset("+09:00").unwrap();
        assert_eq!(format_timestamp(&utc.with_timezone(&jst)), "2026-01-18 09:05:09");
    }

    #[test]
    fn test_parse_utc_offset_invalid() {
        assert!(matches!(parse_utc_offset("Tokyo"), Err(Error::Config(_))));
    }

    #[test]
    fn test_is_valid_timestamp() {
        assert!(is_valid_timestamp("2026-01-18 09:30:00"));
        assert!(!is_valid_timestamp("2026/01/18 09:30"));
        assert!(!is_valid_timestamp(""));
    }

    #[test]
    fn test_log_rows_full_layout() {
        let mut log = FeedbackLog::new();
        log.push(entry("S1", "first"));
        log.push(entry("", "second"));

        let rows = log.to_rows(LogLayout::Full);
        assert_eq!(rows[0], vec!["Setup Number", "Operator", "Feedback", "Date"]);
        assert_eq!(rows.len(), 3);

        let restored = FeedbackLog::from_rows(&rows, LogLayout::Full).unwrap();
        assert_eq!(restored, log);
    }

    #[test]
    fn test_log_rows_text_only_layout() {
        let mut log = FeedbackLog::new();
        log.push(entry("S1", "first"));

        let rows = log.to_rows(LogLayout::TextOnly);
        assert_eq!(rows[1], vec!["2026-01-18 09:30:00", "first"]);

        let restored = FeedbackLog::from_rows(&rows, LogLayout::TextOnly).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.entries()[0].setup_id, NOT_AVAILABLE);
        assert_eq!(restored.entries()[0].feedback, "first");
    }

    #[test]
    fn test_log_from_empty_rows() {
        assert!(FeedbackLog::from_rows(&[], LogLayout::Full).unwrap().is_empty());
    }

    #[test]
    fn test_log_header_must_match_layout() {
        let mut log = FeedbackLog::new();
        log.push(entry("S1", "first"));

        let full_rows = log.to_rows(LogLayout::Full);
        let err = FeedbackLog::from_rows(&full_rows, LogLayout::TextOnly).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(format!("{}", err).contains("Setup Number"));

        let text_rows = log.to_rows(LogLayout::TextOnly);
        assert!(matches!(FeedbackLog::from_rows(&text_rows, LogLayout::Full), Err(Error::Parse(_))));
    }

    #[test]
    fn test_log_header_tolerates_padding() {
        let rows = vec![
            vec![" Timestamp".to_string(), "Feedback ".to_string()],
            vec!["2026-01-18 09:30:00".to_string(), " note ".to_string()],
        ];
        let log = FeedbackLog::from_rows(&rows, LogLayout::TextOnly).unwrap();
        assert_eq!(log.entries()[0].feedback, "note");
    }
}
