//! Data models for rtn-settings.
//!
//! - [`AppConfig`]: the persisted unit (test cases, trash flag, [`SettingsModel`])
//! - [`SettingsModel`]: profile choice, filter patterns, resolutions, languages, options and custom ranks
//! - [`Attribute`] / [`RankCategory`]: the closed attribute universe and its six categories
//! - [`AttributeOverride`], [`CategoryOverrideSet`], [`CustomRanksConfig`]: per-attribute overrides
//! - [`RankingProfile`] / [`ProfileName`]: base weight tables and their identifiers
//! - [`AttributeRecord`]: the title parser's output
//! - [`AppSettings`]: the tool's own settings (log and session locations)
//!
//! # Leniency
//!
//! Documents arrive from old links and hand-edited exports. Every model that
//! can be read from such a document has a `from_value` constructor that never
//! fails: missing or mistyped fields fall back to that field's default, and
//! unknown keys are ignored.

pub mod app_config;
pub mod attribute;
pub mod config;
pub(crate) mod lenient;
pub mod overrides;
pub mod profile;
pub mod record;
pub mod settings;

pub use app_config::{AppConfig, EXAMPLE_RAW_TITLE, TitleCase};
pub use attribute::{Attribute, RankCategory, UnknownName};
pub use config::{AppSettings, LoggingSettings, SessionSettings};
pub use overrides::{AttributeOverride, CategoryOverrideSet, CustomRanksConfig};
pub use profile::{ProfileName, RankingProfile};
pub use record::AttributeRecord;
pub use settings::{
    FilterRule, LanguagesConfig, OptionsConfig, Resolution, ResolutionConfig, SettingsModel,
};
