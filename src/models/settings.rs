use super::lenient::{self, lenient_deserialize};
use super::overrides::CustomRanksConfig;
use super::profile::ProfileName;
use serde::Serialize;
use serde_json::Value;

/// Ordered list of filter patterns.
///
/// A pattern wrapped in slashes (`/Foo/`) is matched case-sensitively,
/// anything else case-insensitively. See [`crate::services::patterns`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FilterRule(pub Vec<String>);

impl FilterRule {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    /// Builds a rule from editor text: one pattern per line, blank lines dropped.
    pub fn from_lines(text: &str) -> Self {
        Self(
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Editor text for this rule, the inverse of [`FilterRule::from_lines`].
    pub fn to_lines(&self) -> String {
        self.0.join("\n")
    }

    pub fn patterns(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn from_value(value: &Value) -> Self {
        Self(lenient::string_list(Some(value)))
    }
}

lenient_deserialize!(FilterRule);

/// Resolution tiers a configuration can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    R2160p,
    R1080p,
    R720p,
    R480p,
    R360p,
    Unknown,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::R2160p => "r2160p",
            Resolution::R1080p => "r1080p",
            Resolution::R720p => "r720p",
            Resolution::R480p => "r480p",
            Resolution::R360p => "r360p",
            Resolution::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolutionConfig {
    pub r2160p: bool,
    pub r1080p: bool,
    pub r720p: bool,
    pub r480p: bool,
    pub r360p: bool,
    pub unknown: bool,
}

impl ResolutionConfig {
    pub fn is_enabled(&self, resolution: Resolution) -> bool {
        match resolution {
            Resolution::R2160p => self.r2160p,
            Resolution::R1080p => self.r1080p,
            Resolution::R720p => self.r720p,
            Resolution::R480p => self.r480p,
            Resolution::R360p => self.r360p,
            Resolution::Unknown => self.unknown,
        }
    }

    /// Enabled tiers, highest first.
    pub fn enabled(&self) -> Vec<Resolution> {
        [
            Resolution::R2160p,
            Resolution::R1080p,
            Resolution::R720p,
            Resolution::R480p,
            Resolution::R360p,
            Resolution::Unknown,
        ]
        .into_iter()
        .filter(|resolution| self.is_enabled(*resolution))
        .collect()
    }

    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Value::Object(map) = value else {
            return defaults;
        };

        Self {
            r2160p: lenient::bool_or(map.get("r2160p"), defaults.r2160p),
            r1080p: lenient::bool_or(map.get("r1080p"), defaults.r1080p),
            r720p: lenient::bool_or(map.get("r720p"), defaults.r720p),
            r480p: lenient::bool_or(map.get("r480p"), defaults.r480p),
            r360p: lenient::bool_or(map.get("r360p"), defaults.r360p),
            unknown: lenient::bool_or(map.get("unknown"), defaults.unknown),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            r2160p: false,
            r1080p: true,
            r720p: true,
            r480p: false,
            r360p: false,
            unknown: true,
        }
    }
}

lenient_deserialize!(ResolutionConfig);

/// Language code lists (e.g. `en`, `es`, `fr`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LanguagesConfig {
    pub required: Vec<String>,
    pub exclude: Vec<String>,
    pub preferred: Vec<String>,
}

impl LanguagesConfig {
    /// Builds the lists from editor text, one code per line.
    pub fn from_lines(required: &str, exclude: &str, preferred: &str) -> Self {
        let codes = |text: &str| -> Vec<String> {
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()
        };

        Self {
            required: codes(required),
            exclude: codes(exclude),
            preferred: codes(preferred),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        Self {
            required: lenient::string_list(map.get("required")),
            exclude: lenient::string_list(map.get("exclude")),
            preferred: lenient::string_list(map.get("preferred")),
        }
    }
}

lenient_deserialize!(LanguagesConfig);

/// Scalar knobs handed to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsConfig {
    /// Minimum similarity ratio between parsed and correct titles, in `[0, 1]`
    pub title_similarity: f64,

    /// Candidates ranked below this value are dropped
    pub remove_ranks_under: i64,

    pub remove_all_trash: bool,
    pub remove_unknown_languages: bool,
    pub allow_english_in_languages: bool,
    pub enable_fetch_speed_mode: bool,
    pub remove_adult_content: bool,
}

impl OptionsConfig {
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Value::Object(map) = value else {
            return defaults;
        };

        let title_similarity =
            lenient::float_or(map.get("title_similarity"), defaults.title_similarity).clamp(0.0, 1.0);

        Self {
            title_similarity,
            remove_ranks_under: lenient::int_or(
                map.get("remove_ranks_under"),
                defaults.remove_ranks_under,
            ),
            remove_all_trash: lenient::bool_or(map.get("remove_all_trash"), defaults.remove_all_trash),
            remove_unknown_languages: lenient::bool_or(
                map.get("remove_unknown_languages"),
                defaults.remove_unknown_languages,
            ),
            allow_english_in_languages: lenient::bool_or(
                map.get("allow_english_in_languages"),
                defaults.allow_english_in_languages,
            ),
            enable_fetch_speed_mode: lenient::bool_or(
                map.get("enable_fetch_speed_mode"),
                defaults.enable_fetch_speed_mode,
            ),
            remove_adult_content: lenient::bool_or(
                map.get("remove_adult_content"),
                defaults.remove_adult_content,
            ),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            title_similarity: 0.85,
            remove_ranks_under: -10000,
            remove_all_trash: true,
            remove_unknown_languages: false,
            allow_english_in_languages: false,
            enable_fetch_speed_mode: true,
            remove_adult_content: true,
        }
    }
}

lenient_deserialize!(OptionsConfig);

/// Root of the ranking configuration.
///
/// One superset schema covering every revision of the settings document:
/// fields added by later revisions (resolutions, languages, options,
/// categorized custom ranks) default when absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SettingsModel {
    pub profile: ProfileName,
    pub require: FilterRule,
    pub exclude: FilterRule,
    pub preferred: FilterRule,
    pub resolutions: ResolutionConfig,
    pub languages: LanguagesConfig,
    pub options: OptionsConfig,
    pub custom_ranks: CustomRanksConfig,
}

impl SettingsModel {
    /// Reads a settings document field by field; each missing or mistyped
    /// field falls back to its own default.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            tracing::debug!("Settings model is not a mapping, using defaults");
            return Self::default();
        };

        let profile = match map.get("profile") {
            Some(Value::String(name)) => ProfileName::from_name(name),
            _ => ProfileName::Default,
        };

        static NULL: Value = Value::Null;
        let field = |key: &str| map.get(key).unwrap_or(&NULL);

        Self {
            profile,
            require: FilterRule::from_value(field("require")),
            exclude: FilterRule::from_value(field("exclude")),
            preferred: FilterRule::from_value(field("preferred")),
            resolutions: ResolutionConfig::from_value(field("resolutions")),
            languages: LanguagesConfig::from_value(field("languages")),
            options: OptionsConfig::from_value(field("options")),
            custom_ranks: match map.get("custom_ranks") {
                Some(section) => CustomRanksConfig::from_value(section),
                None => CustomRanksConfig::default(),
            },
        }
    }
}

lenient_deserialize!(SettingsModel);
