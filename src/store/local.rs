//! ローカルファイルのフィードバックログ
//!
//! 毎回ファイル全体を読み、1行追加して全体を書き戻す。
//! プロセス間の競合検出は行わない（最後の書き込みが勝つ）。

use crate::catalog::range_to_rows;
use crate::error::{DefectLookupError, Result};
use calamine::{open_workbook_auto, Reader};
use defect_lookup_common::{parse_csv, write_csv, FeedbackEntry, FeedbackLog, LogLayout};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Feedback";

#[derive(Debug, Clone)]
pub struct LocalLogStore {
    path: PathBuf,
    layout: LogLayout,
}

impl LocalLogStore {
    pub fn new(path: impl Into<PathBuf>, layout: LogLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ログ全体を読む（ファイルが無ければ空）
    pub fn read(&self) -> Result<FeedbackLog> {
        if !self.path.exists() {
            return Ok(FeedbackLog::new());
        }

        let rows = if self.is_csv() {
            parse_csv(&std::fs::read_to_string(&self.path)?)
        } else {
            read_xlsx_rows(&self.path)?
        };
        Ok(FeedbackLog::from_rows(&rows, self.layout)?)
    }

    /// 読み込み → 追加 → 全体上書き
    ///
    /// 追加後の件数を返す。読めないログには書き込まない。
    pub fn append(&self, entry: FeedbackEntry) -> Result<usize> {
        let mut log = self
            .read()
            .map_err(|e| DefectLookupError::Write(format!("{}: {}", self.path.display(), e)))?;
        log.push(entry);
        self.write(&log)
            .map_err(|e| DefectLookupError::Write(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!(path = %self.path.display(), entries = log.len(), "feedback log written");
        Ok(log.len())
    }

    fn write(&self, log: &FeedbackLog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let rows = log.to_rows(self.layout);
        if self.is_csv() {
            std::fs::write(&self.path, write_csv(&rows))?;
        } else {
            write_xlsx_rows(&self.path, &rows)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
        }
        Ok(())
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

fn read_xlsx_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DefectLookupError::LogRead(format!("{}: {}", path.display(), e)))?;
    match workbook.worksheet_range_at(0) {
        Some(range) => {
            let range = range.map_err(|e| DefectLookupError::LogRead(e.to_string()))?;
            Ok(range_to_rows(&range))
        }
        None => Ok(Vec::new()),
    }
}

fn write_xlsx_rows(path: &Path, rows: &[Vec<String>]) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            if row_idx == 0 {
                worksheet.write_string_with_format(r, c, value, &header_format)?;
            } else {
                worksheet.write_string(r, c, value)?;
            }
        }
    }

    // 列幅: Feedback列を広めに
    if let Some(header) = rows.first() {
        for (col_idx, name) in header.iter().enumerate() {
            let width = if name == "Feedback" { 60.0 } else { 20.0 };
            worksheet.set_column_width(col_idx as u16, width)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use defect_lookup_common::FeedbackDraft;
    use tempfile::tempdir;

    fn entry(text: &str) -> FeedbackEntry {
        FeedbackDraft::new("S1", "Jo", text)
            .into_entry("2026-01-18 09:30:00".into())
            .unwrap()
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = LocalLogStore::new(dir.path().join("none.xlsx"), LogLayout::Full);
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_csv() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("logs").join("feedback.csv");
        let store = LocalLogStore::new(&path, LogLayout::Full);

        assert_eq!(store.append(entry("loose bolt")).unwrap(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Setup Number,Operator,Feedback,Date\n"));
        assert!(content.contains("S1,Jo,loose bolt,2026-01-18 09:30:00"));
    }

    #[test]
    fn test_append_xlsx_preserves_order() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = LocalLogStore::new(dir.path().join("feedback.xlsx"), LogLayout::Full);

        store.append(entry("first")).unwrap();
        store.append(entry("second")).unwrap();
        assert_eq!(store.append(entry("third")).unwrap(), 3);

        let log = store.read().unwrap();
        let texts: Vec<&str> = log.entries().iter().map(|e| e.feedback.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_append_refuses_unreadable_xlsx() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("feedback.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        let store = LocalLogStore::new(&path, LogLayout::Full);

        let err = store.append(entry("x")).unwrap_err();
        assert!(matches!(err, DefectLookupError::Write(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"not a workbook");
    }

    #[test]
    fn test_text_only_layout_columns() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("notes.csv");
        let store = LocalLogStore::new(&path, LogLayout::TextOnly);

        store.append(entry("note, with comma")).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Timestamp,Feedback\n2026-01-18 09:30:00,\"note, with comma\"\n"
        );
    }
}
