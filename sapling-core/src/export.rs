//! CSV export
//!
//! One file per entity collection. The header row is taken from the
//! field names of the first record, every field is quoted (internal
//! quotes doubled), and lines end with CRLF so spreadsheet imports on
//! Windows behave.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::Day;

/// File name for a downloaded export: `<entity>_export_<ISO-date>.csv`.
pub fn export_filename(entity: &str, date: Day) -> String {
    format!("{}_export_{}.csv", entity, date.format("%Y-%m-%d"))
}

/// Serialize a collection of flat JSON objects to CSV.
///
/// Callers produce the rows with `serde_json::to_value` on entity
/// structs, so field order follows the struct declaration. Nulls
/// become empty fields; nested values (should not occur for our
/// entities) fall back to their compact JSON encoding.
pub fn export_csv(rows: &[Value]) -> CoreResult<String> {
    let first = rows.first().ok_or(CoreError::EmptyExport)?;
    let header = first
        .as_object()
        .ok_or(CoreError::NonObjectRow(type_name(first)))?;
    let columns: Vec<&String> = header.keys().collect();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&columns)?;
    for row in rows {
        let object = row
            .as_object()
            .ok_or(CoreError::NonObjectRow(type_name(row)))?;
        let record: Vec<String> = columns
            .iter()
            .map(|col| object.get(*col).map(field_text).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::Csv(e.into_error().into()))?;
    // The writer only ever receives valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Partner;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_export_filename_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(export_filename("partners", date), "partners_export_2024-06-01.csv");
    }

    #[test]
    fn test_export_rejects_empty_collection() {
        assert!(matches!(export_csv(&[]), Err(CoreError::EmptyExport)));
    }

    #[test]
    fn test_export_rejects_non_object_rows() {
        let rows = vec![json!([1, 2, 3])];
        assert!(matches!(export_csv(&rows), Err(CoreError::NonObjectRow(_))));
    }

    #[test]
    fn test_header_from_first_record_and_crlf() {
        let rows = vec![json!({"id": 1, "name": "Org A", "note": null})];
        let csv = export_csv(&rows).unwrap();
        let mut lines = csv.split("\r\n");
        assert_eq!(lines.next().unwrap(), "\"id\",\"name\",\"note\"");
        assert_eq!(lines.next().unwrap(), "\"1\",\"Org A\",\"\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let rows = vec![json!({"name": "say \"hi\", twice"})];
        let csv = export_csv(&rows).unwrap();
        assert!(csv.contains("\"say \"\"hi\"\", twice\""));
    }

    #[test]
    fn test_round_trip_preserves_field_values() {
        let partners = vec![
            Partner {
                id: 1,
                name: "Org \"A\"".to_string(),
                contact: Some("a@example.org, ext. 12".to_string()),
                address: None,
                note: Some("line,with,commas".to_string()),
            },
            Partner {
                id: 2,
                name: "Org B".to_string(),
                contact: None,
                address: Some("12 Forest Rd".to_string()),
                note: None,
            },
        ];
        let rows: Vec<serde_json::Value> = partners
            .iter()
            .map(|p| serde_json::to_value(p).unwrap())
            .collect();
        let csv = export_csv(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["id", "name", "contact", "address", "note"]);

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "Org \"A\"");
        assert_eq!(&records[0][2], "a@example.org, ext. 12");
        assert_eq!(&records[0][4], "line,with,commas");
        assert_eq!(&records[1][3], "12 Forest Rd");
        assert_eq!(&records[1][4], "");
    }
}
