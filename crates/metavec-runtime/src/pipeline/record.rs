//! Source and output record formats.

use std::borrow::Cow;

use metavec_core::emb::EmbeddingVector;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ItemError;

/// `file_path` reported when the metadata record does not carry one.
pub const UNKNOWN_PATH: &str = "unknown_path";

/// A parsed metadata record.
///
/// Keys keep the order in which they appear in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    fields: Map<String, Value>,
}

impl MetadataRecord {
    /// Parses raw object content as a JSON object.
    pub fn parse(raw: &[u8]) -> Result<Self, ItemError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| ItemError::parse(format!("metadata is not valid UTF-8: {e}")))?;

        match serde_json::from_str::<Value>(text).map_err(ItemError::parse)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ItemError::parse(format!(
                "expected a JSON object, found {}",
                value_type(&other)
            ))),
        }
    }

    /// Returns the `file_path` field, or [`UNKNOWN_PATH`] if absent or null.
    ///
    /// Non-string values are rendered as compact JSON.
    pub fn file_path(&self) -> String {
        match self.fields.get("file_path") {
            None | Some(Value::Null) => UNKNOWN_PATH.to_owned(),
            Some(value) => value_text(value).into_owned(),
        }
    }

    /// Joins the text form of every value, in document order, with single
    /// spaces.
    pub fn embedding_text(&self) -> String {
        let parts: Vec<Cow<'_, str>> = self.fields.values().map(value_text).collect();
        parts.join(" ")
    }
}

/// Strings contribute their raw text; everything else its compact JSON.
fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The persisted output of one successfully transformed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Identifier of the source object.
    pub file_name: String,
    /// Embedding of the record's text.
    pub embeddings: EmbeddingVector,
    /// Original file location, or [`UNKNOWN_PATH`].
    pub file_path: String,
}

impl EmbeddingRecord {
    /// Serializes the record as JSON.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemErrorKind;

    #[test]
    fn text_follows_document_order() {
        let record =
            MetadataRecord::parse(br#"{"title":"Q3 report","author":"ana","pages":12}"#).unwrap();
        assert_eq!(record.embedding_text(), "Q3 report ana 12");
    }

    #[test]
    fn non_string_values_use_compact_json() {
        let record = MetadataRecord::parse(
            br#"{"ok": true, "none": null, "ratio": 1.5, "tags": ["a", "b"], "meta": {"k": 1}}"#,
        )
        .unwrap();
        assert_eq!(
            record.embedding_text(),
            r#"true null 1.5 ["a","b"] {"k":1}"#
        );
    }

    #[test]
    fn empty_object_yields_empty_text() {
        let record = MetadataRecord::parse(b"{}").unwrap();
        assert_eq!(record.embedding_text(), "");
        assert_eq!(record.file_path(), UNKNOWN_PATH);
    }

    #[test]
    fn file_path_defaults_when_missing_or_null() {
        let record = MetadataRecord::parse(br#"{"file_path": null}"#).unwrap();
        assert_eq!(record.file_path(), UNKNOWN_PATH);

        let record = MetadataRecord::parse(br#"{"file_path": "/docs/q3.pdf"}"#).unwrap();
        assert_eq!(record.file_path(), "/docs/q3.pdf");
    }

    #[test]
    fn rejects_non_objects() {
        for raw in [&b"[1, 2]"[..], b"\"text\"", b"not json", b"\xff\xfe"] {
            let error = MetadataRecord::parse(raw).unwrap_err();
            assert_eq!(error.kind(), ItemErrorKind::Parse);
        }

        let error = MetadataRecord::parse(b"[1]").unwrap_err();
        assert_eq!(error.message(), "expected a JSON object, found an array");
    }

    #[test]
    fn output_record_has_exactly_three_fields() {
        let record = EmbeddingRecord {
            file_name: "u1/a.json".to_owned(),
            embeddings: EmbeddingVector::new(vec![0.25, 0.5]),
            file_path: UNKNOWN_PATH.to_owned(),
        };

        let json: Value = serde_json::from_slice(&record.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file_name": "u1/a.json",
                "embeddings": [0.25, 0.5],
                "file_path": "unknown_path",
            })
        );
    }
}
