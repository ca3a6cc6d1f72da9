//! Plain-text tables for records and key/value listings

use serde_json::{Map, Value};

/// Key every record carries for type metadata; never shown as a column.
const ATTRIBUTES: &str = "attributes";

/// Text shown in a cell: strings unquoted, `null`/missing empty, anything
/// else as compact JSON.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Column names taken from the first record, minus `attributes`.
pub fn record_columns(records: &[Value]) -> Vec<String> {
    records
        .first()
        .and_then(Value::as_object)
        .map(|first| {
            first
                .keys()
                .filter(|k| k.as_str() != ATTRIBUTES)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Render records as a table whose columns come from the first record.
pub fn records_table(records: &[Value]) -> String {
    let columns = record_columns(records);
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| cell_text(record.get(column)))
                .collect()
        })
        .collect();
    render(&columns, &rows)
}

/// Two-column `Field | Value` table of one object, skipping `attributes`.
pub fn field_value_table(object: &Map<String, Value>) -> String {
    let rows: Vec<Vec<String>> = object
        .iter()
        .filter(|(k, _)| k.as_str() != ATTRIBUTES)
        .map(|(k, v)| vec![k.clone(), cell_text(Some(v))])
        .collect();
    render(&["Field".to_string(), "Value".to_string()], &rows)
}

/// Render a header row, a rule, and the rows, columns padded to width.
pub fn render(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", cell, width = *width)
            })
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(Some(&json!("Acme"))), "Acme");
        assert_eq!(cell_text(Some(&json!(null))), "");
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&json!(42))), "42");
        assert_eq!(cell_text(Some(&json!({"a": 1}))), r#"{"a":1}"#);
    }

    #[test]
    fn test_columns_skip_attributes() {
        let records = vec![json!({"attributes": {"type": "Account"}, "Id": "001A", "Name": "Acme"})];
        assert_eq!(record_columns(&records), ["Id", "Name"]);
        assert!(record_columns(&[]).is_empty());
    }

    #[test]
    fn test_records_table_layout() {
        let records = vec![
            json!({"Id": "001A", "Name": "Acme"}),
            json!({"Id": "001B", "Name": null}),
        ];
        let table = records_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Id   | Name");
        assert_eq!(lines[1], "-----+-----");
        assert_eq!(lines[2], "001A | Acme");
        assert_eq!(lines[3], "001B |");
    }

    #[test]
    fn test_field_value_table() {
        let record = json!({"attributes": {}, "Name": "Acme Inc", "IsSandbox": false});
        let table = field_value_table(record.as_object().unwrap());
        assert!(table.starts_with("Field     | Value"));
        assert!(table.contains("Name      | Acme Inc"));
        assert!(table.contains("IsSandbox | false"));
        assert!(!table.contains("attributes"));
    }
}
