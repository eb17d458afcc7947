use super::attribute::Attribute;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured attributes produced by the title parser for one raw title.
///
/// The parser is an external collaborator, so the record keeps its output as
/// loosely typed JSON values keyed by field name (`resolution`, `codec`,
/// `audio`, `dubbed`, ...). It is consumed read-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    fields: IndexMap<String, Value>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for constructing records in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn raw_title(&self) -> Option<&str> {
        self.fields.get("raw_title").and_then(Value::as_str)
    }

    /// Distinct non-empty textual values, flattened from lists and nested maps.
    ///
    /// A `true` flag contributes its field name, so a `dubbed: true` record
    /// can be matched by a `dubbed` pattern. `false`, `null` and empty strings
    /// contribute nothing.
    pub fn projections(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        for (key, value) in &self.fields {
            collect_text(key, value, &mut out);
        }
        out
    }

    /// The projections joined with spaces. Patterns are tried against this and
    /// against each projection on its own.
    pub fn subject(&self) -> String {
        self.projections().into_iter().collect::<Vec<_>>().join(" ")
    }

    /// Known attributes whose field is present and truthy.
    pub fn present_attributes(&self) -> Vec<Attribute> {
        self.fields
            .iter()
            .filter(|(_, value)| crate::models::lenient::truthy(value))
            .filter_map(|(key, _)| key.parse::<Attribute>().ok())
            .collect()
    }

    /// Non-empty fields as `(name, rendered value)` pairs, for display.
    pub fn non_empty_fields(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|(_, value)| crate::models::lenient::truthy(value))
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }
}

fn collect_text(key: &str, value: &Value, out: &mut IndexSet<String>) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => {
            out.insert(key.to_string());
        }
        Value::Number(number) => {
            out.insert(number.to_string());
        }
        Value::String(text) => {
            let text = text.trim();
            if !text.is_empty() {
                out.insert(text.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(key, item, out);
            }
        }
        Value::Object(map) => {
            for (nested_key, nested) in map {
                collect_text(nested_key, nested, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AttributeRecord {
        AttributeRecord::new()
            .with("raw_title", "Movie.2020.1080p.WEB-DL.DDP5.1")
            .with("resolution", "1080p")
            .with("quality", "WEB-DL")
            .with("audio", json!(["Dolby Digital Plus", ""]))
            .with("year", 2020)
            .with("dubbed", true)
            .with("proper", false)
            .with("codec", "")
            .with("webdl", true)
    }

    #[test]
    fn test_projection_flattens_non_empty_values() {
        let projections = sample().projections();
        assert!(projections.contains("1080p"));
        assert!(projections.contains("Dolby Digital Plus"));
        assert!(projections.contains("2020"));
        assert!(projections.contains("dubbed"));
        assert!(!projections.contains("proper"));
        assert!(!projections.contains(""));
    }

    #[test]
    fn test_subject_is_space_joined() {
        let record = AttributeRecord::new().with("a", "x").with("b", json!(["y", "z"]));
        assert_eq!(record.subject(), "x y z");
    }

    #[test]
    fn test_present_attributes_only_counts_known_truthy_keys() {
        let present = sample().present_attributes();
        assert_eq!(present, vec![Attribute::Dubbed, Attribute::Webdl]);
    }

    #[test]
    fn test_record_deserializes_from_parser_json() {
        let record: AttributeRecord =
            serde_json::from_str(r#"{"raw_title": "X", "hdr": ["DV"], "remux": true}"#).unwrap();
        assert_eq!(record.raw_title(), Some("X"));
        assert_eq!(record.present_attributes(), vec![Attribute::Hdr, Attribute::Remux]);
    }
}
