//! Stdin JSON batch protocol for `esg predict`.
//!
//! The payload is either one flat JSON object or an array of them; each
//! record carries the decision-classifier feature columns. Missing or
//! mistyped fields degrade to defaults (0.0 / "") rather than failing the
//! whole batch.

use std::io::Read;

use serde_json::{Map, Value};

use crate::error::AppError;

/// One flat input record.
pub type Record = Map<String, Value>;

/// Read records from a reader.
///
/// Returns `Ok(None)` for an empty (or whitespace-only) payload so the
/// caller can emit the structured `{"error": "empty input"}` response
/// instead of failing.
pub fn read_records(reader: &mut impl Read) -> Result<Option<Vec<Record>>, AppError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(|e| AppError::usage(format!("Failed to read stdin: {e}")))?;

    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::usage(format!("Invalid JSON input: {e}")))?;

    let records = match value {
        Value::Object(map) => vec![map],
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(map) => out.push(map),
                    other => {
                        return Err(AppError::usage(format!(
                            "Expected JSON objects in input array, found {other}."
                        )))
                    }
                }
            }
            out
        }
        other => {
            return Err(AppError::usage(format!(
                "Expected a JSON object or array, found {other}."
            )))
        }
    };

    Ok(Some(records))
}

/// Numeric field accessor; absent or non-numeric values become 0.0.
pub fn get_f64(record: &Record, key: &str) -> f64 {
    match record.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String field accessor; absent or non-string values become "".
pub fn get_str<'a>(record: &'a Record, key: &str) -> &'a str {
    match record.get(key) {
        Some(Value::String(s)) => s.as_str(),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_input_is_none() {
        let mut cursor = Cursor::new("   \n  ");
        assert!(read_records(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn single_object_becomes_one_record() {
        let mut cursor = Cursor::new(r#"{"sector": "energy", "avg_note": 6.5}"#);
        let records = read_records(&mut cursor).unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(get_str(&records[0], "sector"), "energy");
        assert_eq!(get_f64(&records[0], "avg_note"), 6.5);
    }

    #[test]
    fn array_of_objects() {
        let mut cursor = Cursor::new(r#"[{"a": 1}, {"a": 2}]"#);
        let records = read_records(&mut cursor).unwrap().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(get_f64(&records[1], "a"), 2.0);
    }

    #[test]
    fn scalar_payload_is_an_error() {
        let mut cursor = Cursor::new("42");
        assert!(read_records(&mut cursor).is_err());
    }

    #[test]
    fn accessors_default_gracefully() {
        let mut cursor = Cursor::new(r#"{"n": "7.5", "bad": [1]}"#);
        let records = read_records(&mut cursor).unwrap().unwrap();
        assert_eq!(get_f64(&records[0], "n"), 7.5);
        assert_eq!(get_f64(&records[0], "missing"), 0.0);
        assert_eq!(get_f64(&records[0], "bad"), 0.0);
        assert_eq!(get_str(&records[0], "missing"), "");
    }
}
