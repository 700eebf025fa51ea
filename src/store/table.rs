//! table.rs
//! Raw string tables read from delimited text or JSON row arrays.
//! Typing happens later, in `DatasetStore::from_tables`.

use crate::error::DataLoadError;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { name: name.into(), headers, rows }
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Reads a table from disk. The extension picks the reader.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|source| DataLoadError::Io { path: display.clone(), source })?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| display.clone());

        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("csv") => Self::from_csv_str(&name, &text),
            Some("json") => Self::from_json_str(&name, &text),
            _ => Err(DataLoadError::UnsupportedFormat { path: display }),
        }
    }

    /// Parses comma-separated text with a header row. Fields may be wrapped in
    /// double quotes, with `""` as an escaped quote inside a quoted field.
    pub fn from_csv_str(name: &str, text: &str) -> Result<Self, DataLoadError> {
        // Spreadsheet exports often lead with a UTF-8 byte order mark.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_delimited(text, ',').map_err(|msg| DataLoadError::Parse { table: name.to_string(), msg })?;
        if records.is_empty() {
            return Err(DataLoadError::Parse { table: name.to_string(), msg: "missing header row".into() });
        }
        let headers: Vec<String> = records.remove(0).into_iter().map(|h| h.trim().to_string()).collect();

        for (i, row) in records.iter_mut().enumerate() {
            if row.len() != headers.len() {
                return Err(DataLoadError::Parse {
                    table: name.to_string(),
                    msg: format!("row {} has {} fields, header has {}", i + 1, row.len(), headers.len()),
                });
            }
        }
        Ok(Self::new(name, headers, records))
    }

    /// Parses a JSON array of flat objects. Columns are the union of keys in
    /// first-seen order; absent keys become empty cells.
    pub fn from_json_str(name: &str, text: &str) -> Result<Self, DataLoadError> {
        let parse_err = |msg: String| DataLoadError::Parse { table: name.to_string(), msg };
        let value: Value = serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?;
        let items = value.as_array().ok_or_else(|| parse_err("expected a JSON array of row objects".into()))?;

        let mut headers: Vec<String> = Vec::new();
        for item in items {
            let obj = item.as_object().ok_or_else(|| parse_err("every row must be a JSON object".into()))?;
            for key in obj.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| headers.iter().map(|h| obj.get(h).map(cell_text).unwrap_or_default()).collect())
            .collect();

        Ok(Self::new(name, headers, rows))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_delimited(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            c if c == delimiter => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    records.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".into());
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        records.push(row);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_with_quotes_and_crlf() {
        let text = "Mouse ID,Drug Regimen,Note\r\nk403,Ramicane,\"a, b\"\r\ns185,\"Capo\"\"mulin\",\r\n";
        let t = Table::from_csv_str("meta", text).unwrap();
        assert_eq!(t.headers, vec!["Mouse ID", "Drug Regimen", "Note"]);
        assert_eq!(t.rows[0], vec!["k403", "Ramicane", "a, b"]);
        assert_eq!(t.rows[1], vec!["s185", "Capo\"mulin", ""]);
    }

    #[test]
    fn test_csv_strips_byte_order_mark() {
        let t = Table::from_csv_str("meta", "\u{feff}Mouse ID,Drug Regimen\nk403,Ramicane\n").unwrap();
        assert_eq!(t.headers, vec!["Mouse ID", "Drug Regimen"]);
        assert_eq!(t.column_index("Mouse ID"), Some(0));
    }

    #[test]
    fn test_csv_skips_blank_lines_and_missing_trailing_newline() {
        let t = Table::from_csv_str("t", "a,b\n\n1,2\n3,4").unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows[1], vec!["3", "4"]);
    }

    #[test]
    fn test_csv_rejects_ragged_rows() {
        let err = Table::from_csv_str("t", "a,b\n1\n").unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 fields"), "Msg: {}", err);
    }

    #[test]
    fn test_csv_rejects_unterminated_quote() {
        assert!(Table::from_csv_str("t", "a\n\"oops\n").is_err());
    }

    #[test]
    fn test_json_rows_union_columns() {
        let text = r#"[{"Mouse ID": "a1", "Timepoint": 0}, {"Mouse ID": "a2", "Weight (g)": 21.5}]"#;
        let t = Table::from_json_str("obs", text).unwrap();
        assert_eq!(t.headers.len(), 3);
        let w = t.column_index("Weight (g)").unwrap();
        let tp = t.column_index("Timepoint").unwrap();
        assert_eq!(t.rows[0][tp], "0");
        assert_eq!(t.rows[0][w], "");
        assert_eq!(t.rows[1][w], "21.5");
    }

    #[test]
    fn test_json_rejects_non_array() {
        assert!(matches!(Table::from_json_str("t", "{}"), Err(DataLoadError::Parse { .. })));
    }

    #[test]
    fn test_load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("subjects.csv");
        fs::write(&csv, "Mouse ID\nx1\n").unwrap();
        assert_eq!(Table::load(&csv).unwrap().name, "subjects.csv");

        let txt = dir.path().join("subjects.txt");
        fs::write(&txt, "Mouse ID\nx1\n").unwrap();
        assert!(matches!(Table::load(&txt), Err(DataLoadError::UnsupportedFormat { .. })));

        let missing = dir.path().join("nope.csv");
        assert!(matches!(Table::load(&missing), Err(DataLoadError::Io { .. })));
    }
}
