use super::settings::SettingsModel;
use serde::{Deserialize, Serialize};

/// Raw title used by a freshly generated configuration.
pub const EXAMPLE_RAW_TITLE: &str = "Example.Movie.2020.1080p.BluRay.x264-Example";

/// One test case: a raw release name and, optionally, the title it should parse to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TitleCase {
    pub raw_title: String,
    pub correct_title: String,
}

impl TitleCase {
    pub fn new(raw_title: impl Into<String>, correct_title: impl Into<String>) -> Self {
        Self {
            raw_title: raw_title.into(),
            correct_title: correct_title.into(),
        }
    }

    /// The placeholder case shipped with a generated configuration.
    pub fn example() -> Self {
        Self::new(EXAMPLE_RAW_TITLE, "")
    }
}

/// The persisted unit: test cases, the trash flag and the ranking settings.
///
/// Decoding goes through [`ConfigValidator`](crate::services::ConfigValidator),
/// which is why only `Serialize` is derived here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub titles: Vec<TitleCase>,
    pub remove_trash: bool,
    pub settings_model: SettingsModel,
}

impl AppConfig {
    /// The configuration a first visit starts from.
    pub fn generated() -> Self {
        Self {
            titles: vec![TitleCase::example()],
            remove_trash: true,
            settings_model: SettingsModel::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::generated()
    }
}
