//! 検索結果・ログの表示

use defect_lookup_common::{DefectRecord, FeedbackEntry};
use serde::Serialize;

/// JSON出力用の検索結果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport<'a> {
    pub setup_id: &'a str,
    pub revision: &'a str,
    pub defects: Vec<DefectRow<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectRow<'a> {
    pub defect_name: &'a str,
    pub frequency: String,
    pub preventative_suggestion: &'a str,
}

impl<'a> LookupReport<'a> {
    pub fn new(setup_id: &'a str, revision: &'a str, records: &[&'a DefectRecord]) -> Self {
        Self {
            setup_id,
            revision,
            defects: records
                .iter()
                .map(|&r| DefectRow {
                    defect_name: &r.defect_name,
                    frequency: r.frequency.to_string(),
                    preventative_suggestion: &r.preventative_suggestion,
                })
                .collect(),
        }
    }
}

/// 検索結果を表形式で表示
pub fn print_lookup(setup_id: &str, revision: &str, records: &[&DefectRecord], top_n: usize) {
    println!("カタログ更新日: {}\n", revision);

    if records.is_empty() {
        println!("⚠ セットアップ {} の不具合は見つかりませんでした", setup_id.trim());
        return;
    }

    println!("セットアップ {} の頻出不具合 上位{}件", setup_id.trim(), top_n);
    println!("---");
    for line in format_table(records) {
        println!("{}", line);
    }
}

/// 列幅をそろえた行を作る
pub fn format_table(records: &[&DefectRecord]) -> Vec<String> {
    let headers = ["Defect Name", "Frequency", "Preventative Suggestion"];
    let cells: Vec<[String; 3]> = records
        .iter()
        .map(|r| {
            [
                r.defect_name.clone(),
                r.frequency.to_string(),
                r.preventative_suggestion.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cols: [&str; 3]| {
        cols.iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(headers)];
    lines.extend(cells.iter().map(|r| line([r[0].as_str(), r[1].as_str(), r[2].as_str()])));
    lines
}

/// フィードバックログを表示
pub fn print_log(entries: &[FeedbackEntry]) {
    if entries.is_empty() {
        println!("フィードバックはまだありません");
        return;
    }

    for e in entries {
        println!("[{}] {} / {}", e.timestamp, e.setup_id, e.operator);
        println!("  {}", e.feedback.replace('\n', "\n  "));
    }
}
