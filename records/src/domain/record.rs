use serde_json::{Map, Value};

/// A row in a remote table. Field names are the API's own (`Id`, `Name`, `startDate`, ...).
pub type Record = Map<String, Value>;

/// Opaque record identifier assigned by the remote store.
pub type RecordId = i64;

pub const ID_FIELD: &str = "Id";

/// Typed accessors over the loosely-typed record shape.
pub trait RecordExt {
    fn id(&self) -> Option<RecordId>;
    fn str_field(&self, name: &str) -> Option<&str>;
    fn f64_field(&self, name: &str) -> Option<f64>;
    fn i64_field(&self, name: &str) -> Option<i64>;
}

impl RecordExt for Record {
    fn id(&self) -> Option<RecordId> {
        self.i64_field(ID_FIELD)
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn f64_field(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn i64_field(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Loose equality used for `ExactMatch` filtering: numbers and their string form compare equal.
pub fn values_match(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::String(a), Value::Number(b)) | (Value::Number(b), Value::String(a)) => {
            a == &b.to_string()
        }
        (a, b) => a == b,
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
    fn numeric_fields_accept_strings() {
        let r = record(json!({"Id": "12", "budget": "5000.5", "duration": 3}));
        assert_eq!(r.id(), Some(12));
        assert_eq!(r.f64_field("budget"), Some(5000.5));
        assert_eq!(r.i64_field("duration"), Some(3));
    }

    #[test]
    fn empty_strings_read_as_missing() {
        let r = record(json!({"Name": ""}));
        assert_eq!(r.str_field("Name"), None);
    }

    #[test]
    fn exact_match_compares_number_and_string_forms() {
        assert!(values_match(&json!(7), &json!("7")));
        assert!(values_match(&json!("in-progress"), &json!("in-progress")));
        assert!(!values_match(&json!("In-Progress"), &json!("in-progress")));
    }
}
