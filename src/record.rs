// 📄 Record Model - one decoded line of the quotes file
// Ordered field map + cell rendering rules for tabular export

use serde_json::{Map, Number, Value};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Record - one JSON object decoded from a single input line
///
/// Field order is the order of the source line (serde_json `preserve_order`),
/// which is what the exporter relies on to derive header rows.
pub type Record = Map<String, Value>;

/// Fields used for matching only. They never reach the exported file.
pub const RESERVED_FIELDS: [&str; 2] = ["symbol", "company_name"];

/// Field holding the ticker symbol
pub const SYMBOL_FIELD: &str = "symbol";

/// Field holding the company display name
pub const COMPANY_NAME_FIELD: &str = "company_name";

/// Inclusive range bounds carried by every quote record
pub const START_DATE_FIELD: &str = "start_date";
pub const END_DATE_FIELD: &str = "end_date";

// ============================================================================
// HELPERS
// ============================================================================

/// Remove the reserved fields in place, keeping the order of everything else
pub fn strip_reserved(record: &mut Record) {
    for field in RESERVED_FIELDS {
        // shift_remove keeps the remaining keys in source order
        record.shift_remove(field);
    }
}

/// Render a value as a single CSV cell
///
/// - `true` → `1`, `false` → empty
/// - `null` → empty
/// - numbers in plain decimal form; whole floats lose the `.0` (`150.0` → `150`)
/// - strings as-is (quoting is left to the CSV writer)
/// - nested objects and arrays as compact JSON
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn render_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    // f64 Display never switches to exponent form and drops a trailing `.0`
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

/// Read a string field, `None` when missing, null or not a string
pub fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_render_booleans() {
        assert_eq!(render_cell(&json!(true)), "1");
        assert_eq!(render_cell(&json!(false)), "");
    }

    #[test]
    fn test_render_null() {
        assert_eq!(render_cell(&Value::Null), "");
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(render_cell(&json!(42)), "42");
        assert_eq!(render_cell(&json!(-10)), "-10");
        assert_eq!(render_cell(&json!(3.14)), "3.14");
        assert_eq!(render_cell(&json!(0.0)), "0");
        assert_eq!(render_cell(&json!(150.0)), "150");
        assert_eq!(render_cell(&json!(189.37)), "189.37");
        assert_eq!(render_cell(&json!(-0.0)), "0");
    }

    #[test]
    fn test_render_large_floats_without_exponent() {
        assert_eq!(render_cell(&json!(1e15)), "1000000000000000");
        assert_eq!(render_cell(&json!(1e16)), "10000000000000000");
        assert_eq!(render_cell(&json!(2.5e20)), "250000000000000000000");
        assert_eq!(render_cell(&json!(1e-7)), "0.0000001");
    }

    #[test]
    fn test_render_strings_verbatim() {
        assert_eq!(render_cell(&json!("Value, with comma")), "Value, with comma");
        assert_eq!(render_cell(&json!("Text with \"quotes\"")), "Text with \"quotes\"");
    }

    #[test]
    fn test_render_nested_as_json() {
        assert_eq!(render_cell(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(render_cell(&json!({"name": "John"})), r#"{"name":"John"}"#);
    }

    #[test]
    fn test_strip_reserved_keeps_order() {
        let mut rec = record(json!({
            "id": 1,
            "symbol": "AAPL",
            "price": 150,
            "company_name": "Apple Inc.",
            "volume": 1000
        }));

        strip_reserved(&mut rec);

        let keys: Vec<&str> = rec.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "price", "volume"]);
    }

    #[test]
    fn test_strip_reserved_removes_null_values() {
        let mut rec = record(json!({"id": 1, "symbol": null, "value": 2}));
        strip_reserved(&mut rec);
        assert!(!rec.contains_key("symbol"));
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_str_field() {
        let rec = record(json!({"symbol": "AAPL", "start_date": null, "n": 5}));
        assert_eq!(str_field(&rec, "symbol"), Some("AAPL"));
        assert_eq!(str_field(&rec, "start_date"), None);
        assert_eq!(str_field(&rec, "n"), None);
        assert_eq!(str_field(&rec, "missing"), None);
    }
}
