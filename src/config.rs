//! Configuration for the rate source and file output
//!
//! The NBG page has no stable API; its table markup uses generated class names
//! that change whenever the site is rebuilt. The URL and the three selectors are
//! therefore configuration, overridable from a TOML file:
//!
//! ```toml
//! [source]
//! url = "https://nbg.gov.ge/en/monetary-policy/currency"
//! rows_selector = ".mt-3-4.border-b-2.border-grey-400.border-solid > .jsx-182984682"
//! index_selector = ".jsx-182984682.px-2-2 > span"
//! rate_selector = ".jsx-182984682.flex.items-center.justify-end > span"
//!
//! [output]
//! file_prefix = "nbg-currencies"
//! directory = "."
//! ```

use crate::error::{CurrencyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const NBG_CURRENCIES_URL: &str = "https://nbg.gov.ge/en/monetary-policy/currency";
pub const CURRENCY_ROWS_SELECTOR: &str =
    ".mt-3-4.border-b-2.border-grey-400.border-solid > .jsx-182984682";
pub const CURRENCY_INDEX_SELECTOR: &str = ".jsx-182984682.px-2-2 > span";
pub const CURRENCY_RATE_SELECTOR: &str = ".jsx-182984682.flex.items-center.justify-end > span";
pub const DEFAULT_FILE_PREFIX: &str = "nbg-currencies";

const CONFIG_DIR: &str = ".nbg-currencies";
const CONFIG_FILE: &str = "config.toml";

/// Where to fetch rates from and how to find them in the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// Selects one element per currency row
    #[serde(default = "default_rows_selector")]
    pub rows_selector: String,
    /// Selects the currency code, scoped to a row
    #[serde(default = "default_index_selector")]
    pub index_selector: String,
    /// Selects the conversion rate, scoped to a row
    #[serde(default = "default_rate_selector")]
    pub rate_selector: String,
    /// Request timeout. When unset the HTTP client default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Directory for default-named output files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_url() -> String {
    NBG_CURRENCIES_URL.to_string()
}

fn default_rows_selector() -> String {
    CURRENCY_ROWS_SELECTOR.to_string()
}

fn default_index_selector() -> String {
    CURRENCY_INDEX_SELECTOR.to_string()
}

fn default_rate_selector() -> String {
    CURRENCY_RATE_SELECTOR.to_string()
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            rows_selector: default_rows_selector(),
            index_selector: default_index_selector(),
            rate_selector: default_rate_selector(),
            timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            directory: default_directory(),
        }
    }
}

impl Config {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CurrencyError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| CurrencyError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CurrencyError::Config(e.to_string()))
    }

    /// `~/.nbg-currencies/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing or broken file falls back to built-in defaults with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Config::default(),
        };

        if !path.exists() {
            if explicit {
                log::warn!("Config file {} not found, using defaults", path.display());
            }
            return Config::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Config::default()
            }
        }
    }
}
