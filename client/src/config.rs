use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_url")]
    pub url: String,
    /// Hide the loader and report a stall when no offer arrives in time.
    #[serde(default)]
    pub loader_timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub ansi: bool,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: default_url(),
            loader_timeout_secs: None,
            ansi: true,
            logging: LoggingSettings::default(),
        }
    }
}

fn default_url() -> String { common::DEFAULT_SEARCH_URL.to_string() }
fn default_true() -> bool { true }
fn default_log_level() -> String { "warn".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. Defaults
    /// 2. config/client.toml
    /// 3. Environment variables prefixed with JOBSEARCH_CLIENT
    ///    (e.g. JOBSEARCH_CLIENT__URL -> url)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/client").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn loader_timeout(&self) -> Option<Duration> {
        self.loader_timeout_secs.map(Duration::from_secs)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("JOBSEARCH_CLIENT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
