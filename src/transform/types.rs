//! Record type and transformation errors.

use serde_json::{Map, Value};
use thiserror::Error;

/// One upstream row: field name to JSON value.
pub type Record = Map<String, Value>;

/// Errors that abort the transformation of a response.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A field required for the title is missing or null.
    #[error("record {id} has no {field}")]
    MissingField { id: String, field: &'static str },

    /// `created_date` is not an ISO-8601 timestamp.
    #[error("record {id} has unparsable {field} {value:?}")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
    },

    /// A floating timestamp falls into a daylight-saving gap.
    #[error("record {id} has {field} {value:?} which does not exist in {zone}")]
    NonexistentLocalTime {
        id: String,
        field: &'static str,
        value: String,
        zone: String,
    },

    /// The feature collection could not be serialized.
    #[error("failed to serialize feature collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Render a field as plain text. Strings are unquoted; null and missing
/// fields yield `None`.
pub fn field_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Identifier used in error messages.
pub(crate) fn display_id(record: &Record, id_field: &str) -> String {
    field_text(record, id_field).unwrap_or_else(|| "<no id>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_text() {
        let record = json!({"a": "x", "b": 12, "c": null, "d": true})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(field_text(&record, "a").as_deref(), Some("x"));
        assert_eq!(field_text(&record, "b").as_deref(), Some("12"));
        assert_eq!(field_text(&record, "c"), None);
        assert_eq!(field_text(&record, "d").as_deref(), Some("true"));
        assert_eq!(field_text(&record, "missing"), None);
    }

    #[test]
    fn test_error_display() {
        let err = TransformError::InvalidTimestamp {
            id: "42".into(),
            field: "created_date",
            value: "yesterday".into(),
        };
        assert_eq!(err.to_string(), "record 42 has unparsable created_date \"yesterday\"");
    }
}
