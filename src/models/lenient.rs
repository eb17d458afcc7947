// Lenient readers for loosely typed JSON documents.
//
// Decoded blobs and imported files come from older schema revisions and from
// hand edits, so every typed model reads its fields through these helpers:
// a missing or mistyped field yields the caller's default instead of an error.

use serde_json::Value;

/// Truthiness in the usual dynamic-language sense.
///
/// `null`, `false`, `0`, `0.0`, `""`, `[]` and `{}` are falsy, everything else is truthy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub(crate) fn bool_or(value: Option<&Value>, default: bool) -> bool {
    value.map(truthy).unwrap_or(default)
}

/// Reads an integer, accepting floats (truncated), numeric strings and booleans.
pub(crate) fn int_or(value: Option<&Value>, default: i64) -> i64 {
    let Some(value) = value else {
        return default;
    };

    let coerced = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().map(|n| n.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
        }
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    };

    coerced.unwrap_or_else(|| {
        tracing::debug!("Expected an integer, got {}; using {}", value, default);
        default
    })
}

pub(crate) fn float_or(value: Option<&Value>, default: f64) -> f64 {
    let Some(value) = value else {
        return default;
    };

    let coerced = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };

    coerced.unwrap_or_else(|| {
        tracing::debug!("Expected a number, got {}; using {}", value, default);
        default
    })
}

/// Reads a string; numbers and booleans are rendered, anything else yields the default.
pub(crate) fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => default.to_string(),
    }
}

/// Reads a list of strings, dropping non-string items. A non-list yields an empty list.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                other => {
                    tracing::debug!("Dropping non-string list item: {}", other);
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::debug!("Expected a list of strings, got {}", other);
            Vec::new()
        }
    }
}

/// Implements `Deserialize` for a type that has a lenient `from_value(&Value) -> Self`.
macro_rules! lenient_deserialize {
    ($ty:ty) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = serde_json::Value::deserialize(deserializer)?;
                Ok(<$ty>::from_value(&value))
            }
        }
    };
}

pub(crate) use lenient_deserialize;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy_follows_dynamic_conventions() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!([])));
        assert!(!truthy(&json!({})));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("false")));
        assert!(truthy(&json!([0])));
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(int_or(Some(&json!(90)), 0), 90);
        assert_eq!(int_or(Some(&json!(12.9)), 0), 12);
        assert_eq!(int_or(Some(&json!(" -40 ")), 0), -40);
        assert_eq!(int_or(Some(&json!("7.5")), 0), 7);
        assert_eq!(int_or(Some(&json!(true)), 0), 1);
        assert_eq!(int_or(Some(&json!("lots")), 5), 5);
        assert_eq!(int_or(None, -3), -3);
    }

    #[test]
    fn test_string_list_drops_junk() {
        let value = json!(["a", 1, null, "b"]);
        assert_eq!(string_list(Some(&value)), vec!["a", "b"]);
        assert!(string_list(Some(&json!("a"))).is_empty());
    }
}
