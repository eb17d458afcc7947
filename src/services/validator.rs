//! Repairs an arbitrary decoded document into a well-formed [`AppConfig`].
//!
//! Only the top-level shape is checked here. Fields inside the settings
//! model are read leniently by [`SettingsModel::from_value`], each falling
//! back to its own default.

use crate::models::lenient;
use crate::models::{AppConfig, SettingsModel, TitleCase};
use serde_json::{Map, Value};

const REQUIRED_KEYS: [&str; 3] = ["titles", "remove_trash", "settings_model"];

pub struct ConfigValidator;

impl ConfigValidator {
    /// Never fails; the worst case is the generated default configuration.
    pub fn validate(candidate: Value) -> AppConfig {
        let Value::Object(map) = candidate else {
            tracing::warn!("Stored configuration is not a mapping, regenerating defaults");
            return AppConfig::generated();
        };

        if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !map.contains_key(**key)) {
            tracing::warn!("Stored configuration lacks {:?}, regenerating defaults", missing);
            return AppConfig::generated();
        }

        AppConfig {
            titles: Self::titles(&map),
            remove_trash: lenient::bool_or(map.get("remove_trash"), true),
            settings_model: Self::settings_model(&map),
        }
    }

    fn titles(map: &Map<String, Value>) -> Vec<TitleCase> {
        let Some(Value::Array(items)) = map.get("titles") else {
            tracing::debug!("Titles are not a list, using the example title");
            return vec![TitleCase::example()];
        };

        items.iter().map(Self::title_case).collect()
    }

    fn title_case(item: &Value) -> TitleCase {
        let Value::Object(fields) = item else {
            tracing::debug!("Replacing malformed test case {}", item);
            return TitleCase::default();
        };

        let raw = fields.get("raw_title");
        let correct = fields.get("correct_title");
        if raw.is_none() && correct.is_none() {
            tracing::debug!("Replacing test case without titles");
            return TitleCase::default();
        }

        TitleCase {
            raw_title: lenient::string_or(raw, ""),
            correct_title: lenient::string_or(correct, ""),
        }
    }

    fn settings_model(map: &Map<String, Value>) -> SettingsModel {
        match map.get("settings_model") {
            Some(value @ Value::Object(_)) => SettingsModel::from_value(value),
            _ => {
                tracing::debug!("Settings model is not a mapping, using defaults");
                SettingsModel::default()
            }
        }
    }
}
