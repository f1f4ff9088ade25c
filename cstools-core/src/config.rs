use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CsToolsError, CsToolsResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CsToolsConfig {
    #[serde(default)]
    pub thoughtspot: ThoughtSpotConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtSpotConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub disable_ssl: bool,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Batch and chunk sizes used by the metadata middlewares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_columns_chunksize")]
    pub columns_chunksize: usize,

    #[serde(default = "default_permissions_chunksize")]
    pub permissions_chunksize: usize,

    #[serde(default = "default_dependents_chunksize")]
    pub dependents_chunksize: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_table_width")]
    pub table_width: u16,

    #[serde(default = "default_true")]
    pub live: bool,
}

fn default_timeout() -> u64 {
    60
}

fn default_page_size() -> usize {
    500
}

fn default_columns_chunksize() -> usize {
    50
}

fn default_permissions_chunksize() -> usize {
    15
}

fn default_dependents_chunksize() -> usize {
    50
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_table_width() -> u16 {
    150
}

impl Default for ThoughtSpotConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            password: None,
            disable_ssl: false,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            columns_chunksize: default_columns_chunksize(),
            permissions_chunksize: default_permissions_chunksize(),
            dependents_chunksize: default_dependents_chunksize(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            table_width: default_table_width(),
            live: true,
        }
    }
}

impl CsToolsConfig {
    pub fn load() -> CsToolsResult<Self> {
        Self::load_from_paths(get_config_paths())
    }

    /// Load the default search paths plus one explicitly requested file, which must exist.
    pub fn load_with_file(extra: Option<PathBuf>) -> CsToolsResult<Self> {
        let mut paths = get_config_paths();

        if let Some(path) = extra {
            if !path.exists() {
                return Err(CsToolsError::MissingConfig(path.display().to_string()));
            }
            paths.push(path);
        }

        Self::load_from_paths(paths)
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> CsToolsResult<Self> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CSTOOLS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: CsToolsConfig = builder.build()?.try_deserialize()?;

        if let Ok(url) = std::env::var("CSTOOLS_URL") {
            cfg.thoughtspot.url = url;
        }

        if let Ok(username) = std::env::var("CSTOOLS_USERNAME") {
            cfg.thoughtspot.username = Some(username);
        }

        if let Ok(password) = std::env::var("CSTOOLS_PASSWORD") {
            cfg.thoughtspot.password = Some(password);
        }

        if let Ok(level) = std::env::var("CSTOOLS_LOG_LEVEL") {
            cfg.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            cfg.logging.level = level;
        }

        cfg.validate()?;

        Ok(cfg)
    }

    pub fn validate(&self) -> CsToolsResult<()> {
        let url = &self.thoughtspot.url;
        if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CsToolsError::InvalidConfigValue {
                key: "thoughtspot.url".to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        let sizes = [
            ("fetch.page_size", self.fetch.page_size),
            ("fetch.columns_chunksize", self.fetch.columns_chunksize),
            ("fetch.permissions_chunksize", self.fetch.permissions_chunksize),
            ("fetch.dependents_chunksize", self.fetch.dependents_chunksize),
        ];

        for (key, value) in sizes {
            if value == 0 {
                return Err(CsToolsError::InvalidConfigValue {
                    key: key.to_string(),
                    message: "Must be greater than 0".to_string(),
                });
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(CsToolsError::InvalidConfigValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// The platform URL, failing when none has been configured.
    pub fn require_url(&self) -> CsToolsResult<&str> {
        if self.thoughtspot.url.is_empty() {
            return Err(CsToolsError::MissingConfig("thoughtspot.url".to_string()));
        }
        Ok(self.thoughtspot.url.trim_end_matches('/'))
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("cstools.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cstools").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".cstools").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cstools").join(".env"));
    }

    for path in paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cstools"))
}
