//! Plain JSON export and import of a [`SettingsModel`].
//!
//! Imports are checked at the top level (required keys present, each
//! top-level field of the right JSON type) and rejected as a whole when that
//! fails. Inside an accepted document, fields are coerced the same way a
//! decoded configuration is.

use crate::models::SettingsModel;
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde_json::Value;
use std::fs;
use thiserror::Error;

/// Why an import document was refused. State is never touched on rejection.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("settings document must be a JSON object")]
    NotAnObject,

    #[error("settings document is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("settings field `{field}` must be {expected}")]
    MistypedField {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Clone, Copy)]
enum Shape {
    String,
    List,
    Object,
}

impl Shape {
    fn matches(self, value: &Value) -> bool {
        match self {
            Shape::String => value.is_string(),
            Shape::List => value.is_array(),
            Shape::Object => value.is_object(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Shape::String => "a string",
            Shape::List => "a list",
            Shape::Object => "an object",
        }
    }
}

const REQUIRED_FIELDS: [(&str, Shape); 5] = [
    ("profile", Shape::String),
    ("require", Shape::List),
    ("exclude", Shape::List),
    ("preferred", Shape::List),
    ("custom_ranks", Shape::Object),
];

const OPTIONAL_FIELDS: [(&str, Shape); 3] = [
    ("resolutions", Shape::Object),
    ("languages", Shape::Object),
    ("options", Shape::Object),
];

/// Pretty-printed JSON for a settings export.
pub fn export_settings(settings: &SettingsModel) -> Result<String> {
    serde_json::to_string_pretty(settings).context("Failed to serialize settings to JSON")
}

pub fn export_settings_file(settings: &SettingsModel, path: &Utf8Path) -> Result<()> {
    let json = export_settings(settings)?;
    fs::write(path, json).with_context(|| format!("Failed to write settings export: {}", path))?;
    tracing::info!("Exported settings to {}", path);
    Ok(())
}

/// Parses and checks an import document.
pub fn import_settings(json: &str) -> Result<SettingsModel, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = &value else {
        return Err(ImportError::NotAnObject);
    };

    for (field, shape) in REQUIRED_FIELDS {
        match map.get(field) {
            None => return Err(ImportError::MissingField(field)),
            Some(found) if !shape.matches(found) => {
                return Err(ImportError::MistypedField {
                    field,
                    expected: shape.describe(),
                });
            }
            Some(_) => {}
        }
    }

    for (field, shape) in OPTIONAL_FIELDS {
        if let Some(found) = map.get(field) {
            if !shape.matches(found) {
                return Err(ImportError::MistypedField {
                    field,
                    expected: shape.describe(),
                });
            }
        }
    }

    Ok(SettingsModel::from_value(&value))
}

pub fn import_settings_file(path: &Utf8Path) -> Result<SettingsModel, ImportError> {
    let json = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_string(),
        source,
    })?;
    let settings = import_settings(&json)?;
    tracing::info!("Imported settings from {}", path);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attribute, AttributeOverride, FilterRule, ProfileName, RankCategory};
    use camino::Utf8PathBuf;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_export_then_import_preserves_settings() {
        let mut settings = SettingsModel::default();
        settings.profile = ProfileName::Web;
        settings.require = FilterRule::new(["1080p"]);
        settings
            .custom_ranks
            .get_mut(RankCategory::Extras)
            .insert(Attribute::Proper, AttributeOverride::custom(20));

        let json = export_settings(&settings).unwrap();
        assert_eq!(import_settings(&json).unwrap(), settings);
    }

    #[test]
    fn test_import_rejects_non_object() {
        assert!(matches!(import_settings("[1]"), Err(ImportError::NotAnObject)));
        assert!(matches!(import_settings("{oops"), Err(ImportError::InvalidJson(_))));
    }

    #[test]
    fn test_import_rejects_missing_field() {
        let doc = json!({"profile": "default", "require": [], "exclude": []});
        let err = import_settings(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("preferred")));
    }

    #[test]
    fn test_import_rejects_mistyped_field() {
        let doc = json!({
            "profile": "default",
            "require": "CAM",
            "exclude": [],
            "preferred": [],
            "custom_ranks": {}
        });
        let err = import_settings(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::MistypedField { field: "require", .. }));

        let doc = json!({
            "profile": "default",
            "require": [],
            "exclude": [],
            "preferred": [],
            "custom_ranks": {},
            "options": 3
        });
        let err = import_settings(&doc.to_string()).unwrap_err();
        assert_eq!(err.to_string(), "settings field `options` must be an object");
    }

    #[test]
    fn test_import_coerces_inner_fields() {
        let doc = json!({
            "profile": "mystery",
            "require": ["a", 1],
            "exclude": [],
            "preferred": [],
            "custom_ranks": {"quality": {"webdl": {"fetch": 1, "rank": "12", "enable": true}, "zzz": {}}}
        });
        let settings = import_settings(&doc.to_string()).unwrap();

        assert_eq!(settings.profile, ProfileName::Default);
        assert_eq!(settings.require, FilterRule::new(["a"]));
        let webdl = settings.custom_ranks.lookup(Attribute::Webdl).unwrap();
        assert_eq!(*webdl, AttributeOverride::custom(12));
        assert_eq!(settings.custom_ranks.quality.len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("settings.json")).unwrap();

        export_settings_file(&SettingsModel::default(), &path).unwrap();
        assert_eq!(import_settings_file(&path).unwrap(), SettingsModel::default());

        let missing = path.with_file_name("missing.json");
        assert!(matches!(
            import_settings_file(&missing),
            Err(ImportError::Io { .. })
        ));
    }
}
