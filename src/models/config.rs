use serde::{Deserialize, Serialize};

/// Settings for the tool itself, from `rtn-settings.yaml` plus `RTN_*` environment overrides.
///
/// These describe where logs and the session blob live; the ranking
/// configuration proper is [`AppConfig`](crate::models::AppConfig).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub console_output: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            debug_mode: false,
            console_output: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// File holding the encoded configuration blob, relative to the config directory
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "rtn-settings".to_string()
}

fn default_session_file() -> String {
    "session.conf".to_string()
}
