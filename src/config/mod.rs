use crate::models::AppSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Prefix for environment overrides, e.g. `RTN_LOGGING__DEBUG_MODE=true`.
pub const ENV_PREFIX: &str = "RTN";

pub const SETTINGS_FILE_NAME: &str = "rtn-settings.yaml";

/// Configuration manager for the tool's own settings.
///
/// Settings are layered: built-in defaults, then `rtn-settings.yaml` in the
/// configuration directory (optional), then `RTN_*` environment variables.
/// The session blob file is resolved relative to the same directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE_NAME),
            config_dir,
        })
    }

    /// Load the layered settings, reading overrides from the process environment.
    pub fn load_app_settings(&self) -> Result<AppSettings> {
        self.load_with_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load the layered settings with an explicit set of environment variables.
    pub fn load_app_settings_from(
        &self,
        variables: config::Map<String, String>,
    ) -> Result<AppSettings> {
        self.load_with_environment(Environment::with_prefix(ENV_PREFIX).source(Some(variables)))
    }

    fn load_with_environment(&self, environment: Environment) -> Result<AppSettings> {
        let defaults = Config::try_from(&AppSettings::default())
            .context("Failed to build default settings")?;

        if self.settings_path.exists() {
            tracing::info!("Loading settings from {}", self.settings_path);
        } else {
            tracing::debug!("No settings file at {}, using defaults", self.settings_path);
        }

        let layered = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(self.settings_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                environment
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?;

        layered
            .try_deserialize::<AppSettings>()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))
    }

    /// Save the settings file.
    pub fn save_app_settings(&self, settings: &AppSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Where the session blob is kept for the given settings.
    pub fn session_path(&self, settings: &AppSettings) -> Utf8PathBuf {
        self.config_dir.join(&settings.session.session_file)
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
