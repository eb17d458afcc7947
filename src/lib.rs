// rtn-settings - ranking profile configuration for media release names
//
// This is the library crate containing the configuration engine and data structures.
// The binary crate (main.rs) provides the command line front end.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{AppConfig, AppSettings, AttributeOverride, CustomRanksConfig, SettingsModel};
pub use services::{ConfigCodec, ConfigValidator, EffectiveTable, PatternRuleSet, ProfileCatalog};
pub use state::{ConfigChange, SessionStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
