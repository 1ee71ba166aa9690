//! 不具合カタログの構築と検索
//!
//! 表形式のセル（文字列化済み）からカタログを組み立て、
//! セットアップ番号で上位N件を取り出す。
//! 読み込み時と検索時で同じ正規化を使うこと。

use crate::error::{Error, Result};
use crate::types::{Catalog, DefectRecord, Frequency};

/// 検索結果の既定件数
pub const DEFAULT_TOP_N: usize = 6;

pub const COL_SETUP: &str = "Setup Number";
pub const COL_DEFECT: &str = "Defect Name";
pub const COL_FREQUENCY: &str = "Frequency";
pub const COL_SUGGESTION: &str = "Preventative Suggestion";

/// 必須列
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_SETUP, COL_DEFECT, COL_FREQUENCY, COL_SUGGESTION];

/// セットアップ番号の正規化（前後空白除去 + 大文字化）
pub fn normalize_setup_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// ヘッダー行から必須列の位置を求める
struct ColumnIndex {
    setup: usize,
    defect: usize,
    frequency: usize,
    suggestion: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema(missing));
        }

        // 上でチェック済み
        let get = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            setup: get(COL_SETUP),
            defect: get(COL_DEFECT),
            frequency: get(COL_FREQUENCY),
            suggestion: get(COL_SUGGESTION),
        })
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}

/// 先頭行をヘッダーとしてカタログを構築
///
/// セットアップ番号が空の行は読み飛ばす。頻度が不明な行は残す。
pub fn build_catalog(rows: &[Vec<String>], revision: Option<String>) -> Result<Catalog> {
    let Some((header, body)) = rows.split_first() else {
        return Err(Error::Schema(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        ));
    };
    let columns = ColumnIndex::from_header(header)?;

    let records = body
        .iter()
        .filter(|row| !cell(row, columns.setup).is_empty())
        .map(|row| DefectRecord {
            setup_id: cell(row, columns.setup).to_string(),
            defect_name: cell(row, columns.defect).to_string(),
            frequency: Frequency::parse(cell(row, columns.frequency)),
            preventative_suggestion: cell(row, columns.suggestion).to_string(),
        })
        .collect();

    Ok(Catalog::new(records, revision))
}

/// セットアップ番号で検索し、頻度順に上位 `top_n` 件を返す
///
/// 同順位は元の並びを保つ。該当なしは空のVec。
pub fn lookup<'a>(catalog: &'a Catalog, raw_setup_id: &str, top_n: usize) -> Vec<&'a DefectRecord> {
    let key = normalize_setup_id(raw_setup_id);
    if key.is_empty() {
        return Vec::new();
    }

    let mut matched: Vec<&DefectRecord> = catalog
        .records
        .iter()
        .filter(|r| normalize_setup_id(&r.setup_id) == key)
        .collect();

    // sort_by は安定ソート
    matched.sort_by(|a, b| b.frequency.rank().cmp(&a.frequency.rank()));
    matched.truncate(top_n);
    matched
}
