use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub index: IndexSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    /// JSON array of jobs to index at startup
    #[serde(default = "default_jobs_path")]
    pub jobs_path: PathBuf,
    /// On-disk index directory. Unset keeps the index in RAM.
    #[serde(default = "default_index_path")]
    pub path: Option<PathBuf>,
    /// Offers sent per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Hits pulled from the index before the location filter
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            jobs_path: default_jobs_path(),
            path: default_index_path(),
            max_results: default_max_results(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_jobs_path() -> PathBuf { PathBuf::from("data/jobs.json") }
fn default_index_path() -> Option<PathBuf> { Some(PathBuf::from("search_index")) }
fn default_max_results() -> usize { 50 }
fn default_max_candidates() -> usize { 500 }
fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. Defaults
    /// 2. config/server.toml
    /// 3. Environment variables prefixed with JOBSEARCH_SERVER
    ///    (e.g. JOBSEARCH_SERVER__SERVER__PORT -> server.port)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/server").required(false))
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

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("JOBSEARCH_SERVER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
