//! Services module - the configuration engine.
//!
//! Everything here is pure: no global mutable state, no persistence beyond
//! the explicit file helpers in [`settings_io`]. The live configuration is
//! owned by [`crate::state::SessionStore`], which calls into these services.
//!
//! # Components
//!
//! - [`ProfileCatalog`]: the fixed set of built-in ranking profiles.
//! - [`resolver`]: combines a profile's base weights with the user's
//!   per-attribute overrides into an [`EffectiveTable`].
//! - [`PatternRuleSet`]: require / exclude / preferred pattern evaluation
//!   against a parsed title.
//! - [`ConfigCodec`]: compact URL-safe encoding of a whole [`AppConfig`].
//! - [`ConfigValidator`]: repairs any decoded document into a usable
//!   [`AppConfig`].
//! - [`settings_io`]: plain JSON export/import of the settings model.
//! - [`scoring`]: seams to the external title parser and scorer.
//!
//! # Usage Example
//!
//! ```ignore
//! use rtn_settings::services::{ConfigCodec, resolver};
//!
//! let (config, regenerated) = ConfigCodec::decode_or_generate(Some(&blob));
//! let table = resolver::resolve_settings(&config.settings_model);
//! println!("webdl weighs {}", table.weight(Attribute::Webdl));
//! ```
//!
//! [`AppConfig`]: crate::models::AppConfig

pub mod codec;
pub mod patterns;
pub mod profiles;
pub mod resolver;
pub mod scoring;
pub mod settings_io;
pub mod validator;

pub use codec::{ConfigCodec, DecodeError, EncodeError, MAX_DECODED_BYTES};
pub use patterns::{
    CompiledPattern, CompiledRule, FilterOutcome, Haystack, PatternError, PatternRuleSet,
    pattern_matches,
};
pub use profiles::ProfileCatalog;
pub use resolver::{EffectiveEntry, EffectiveTable, resolve, resolve_settings};
pub use scoring::{
    ScoreOutcome, Scorer, ScoringInputs, TitleParser, TitleReport, evaluate_all, evaluate_title,
};
pub use settings_io::{
    ImportError, export_settings, export_settings_file, import_settings, import_settings_file,
};
pub use validator::ConfigValidator;
