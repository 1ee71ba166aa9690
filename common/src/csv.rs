//! CSV読み書き
//!
//! フィードバックログとCSVカタログ用。
//! クォート内のカンマ・改行、`""` エスケープに対応する。

/// CSV文字列を行×セルに分解
///
/// 空行は読み飛ばす。
pub fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // 最後の行
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|cell| !cell.trim().is_empty()) {
        rows.push(row);
    }
}

/// 行×セルをCSV文字列に変換（末尾改行あり）
pub fn write_csv<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|cell| escape_field(cell.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let rows = parse_csv("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_parse_quoted_comma_and_newline() {
        let rows = parse_csv("id,text\r\nS1,\"loose, bolt\"\nS2,\"line1\nline2\"");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "loose, bolt");
        assert_eq!(rows[2][1], "line1\nline2");
    }

    #[test]
    fn test_parse_escaped_quote() {
        let rows = parse_csv("x\n\"say \"\"hi\"\"\"\n");
        assert_eq!(rows[1][0], "say \"hi\"");
    }

    #[test]
    fn test_parse_skips_blank_lines_and_bom() {
        let rows = parse_csv("\u{feff}h1,h2\n\n,\nv1,v2\n");
        assert_eq!(rows, vec![vec!["h1", "h2"], vec!["v1", "v2"]]);
    }

    #[test]
    fn test_write_then_parse_preserves_special_fields() {
        let rows = vec![
            vec!["Setup Number", "Feedback"],
            vec!["S1", "a, \"quoted\"\nnote"],
        ];
        let text = write_csv(&rows);
        assert_eq!(parse_csv(&text), rows);
    }

    #[test]
    fn test_write_plain_fields_unquoted() {
        assert_eq!(write_csv(&[vec!["a", "b"]]), "a,b\n");
    }
}
