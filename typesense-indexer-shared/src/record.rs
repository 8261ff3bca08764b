//! Record and batch types.

use serde_json::{Map, Value};

/// Field Typesense uses as the document identity.
pub const ID_FIELD: &str = "id";

/// A single document: an ordered mapping from field name to a JSON value.
///
/// Field order is preserved as decoded from the source.
pub type Record = Map<String, Value>;

/// An ordered, non-empty group of records submitted in one request.
pub type Batch = Vec<Record>;

/// Return the identity of a record as a string, if it has one.
///
/// Typesense accepts string ids; numeric ids are rendered with their JSON
/// representation so diagnostics can still point at the offending record.
pub fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_FIELD)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_id_string() {
        let r = record(json!({"id": "fr", "countryName": "France"}));
        assert_eq!(record_id(&r), Some("fr".to_string()));
    }

    #[test]
    fn test_record_id_number() {
        let r = record(json!({"id": 42}));
        assert_eq!(record_id(&r), Some("42".to_string()));
    }

    #[test]
    fn test_record_id_missing_or_invalid() {
        assert!(record_id(&record(json!({"name": "x"}))).is_none());
        assert!(record_id(&record(json!({"id": ["a"]}))).is_none());
    }

    #[test]
    fn test_record_preserves_field_order() {
        let r: Record = serde_json::from_str(r#"{"b":1,"a":2,"c":3}"#).unwrap();
        let keys: Vec<&str> = r.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
