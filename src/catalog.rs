//! 不具合カタログ読み込みモジュール
//!
//! Excel（先頭シート）またはCSVからカタログを読み込む。
//! 改訂マーカーは `Revision` シートの B1 セルから取得し、
//! 取得できない場合は "Unknown" とする。

use crate::error::{DefectLookupError, Result};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::Timelike;
use defect_lookup_common::{build_catalog, parse_csv, Catalog};
use std::path::Path;

/// 改訂マーカーを持つシート名
pub const REVISION_SHEET: &str = "Revision";

/// 改訂マーカーのセル位置（B1、0始まり）
pub const REVISION_CELL: (u32, u32) = (0, 1);

/// カタログを読み込む
///
/// 必須列が無い場合はSchemaエラー。部分的なカタログは返さない。
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(DefectLookupError::FileNotFound(path.display().to_string()));
    }

    let (rows, revision) = if is_csv(path) {
        let content = std::fs::read_to_string(path)?;
        (parse_csv(&content), None)
    } else {
        read_workbook(path)?
    };

    let catalog = build_catalog(&rows, revision)?;
    tracing::debug!(
        path = %path.display(),
        records = catalog.len(),
        revision = %catalog.revision,
        "catalog loaded"
    );
    Ok(catalog)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// 先頭シートの全セルと改訂マーカーを読む
fn read_workbook(path: &Path) -> Result<(Vec<Vec<String>>, Option<String>)> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DefectLookupError::CatalogRead(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DefectLookupError::CatalogRead(format!("シートがありません: {}", path.display())))?
        .map_err(|e| DefectLookupError::CatalogRead(e.to_string()))?;
    let rows = range_to_rows(&range);

    // 改訂マーカーは取得できなくてもエラーにしない
    let revision = match workbook.worksheet_range(REVISION_SHEET) {
        Ok(sheet) => revision_from_range(&sheet),
        Err(e) => {
            tracing::debug!(error = %e, "revision sheet not available");
            None
        }
    };

    Ok((rows, revision))
}

pub(crate) fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect()
}

/// セル値を文字列化（整数値の数値セルは小数点なし）
pub(crate) fn cell_to_string(data: &Data) -> String {
    match data {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
            Some(dt) if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => data.to_string(),
        },
        other => other.to_string(),
    }
}

fn revision_from_range(range: &Range<Data>) -> Option<String> {
    range
        .get_value(REVISION_CELL)
        .map(cell_to_string)
        .filter(|s| !s.trim().is_empty())
}
