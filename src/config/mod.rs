//! Configuration management.
//!
//! Configuration is read from `~/.config/kliping/config.toml` (or the path
//! given with `--config`). If the file doesn't exist, a default configuration
//! with comments is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::crawler::config::{CrawlConfig, PolitenessConfig};
use crate::driver::DriverConfig;
use crate::retry::RetryConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub retry: RetryConfig,
    pub politeness: PolitenessConfig,
    pub browser: DriverConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing default file is created with commented defaults. A missing
    /// explicit file is an error. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/kliping/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("kliping").join("config.toml"))
    }

    /// Reject settings the crawler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.crawl.base_url).map_err(|e| {
            ConfigError::Invalid(format!("crawl.base_url {:?}: {e}", self.crawl.base_url))
        })?;

        let from = parse_range_date("crawl.date_from", &self.crawl.date_from)?;
        let to = parse_range_date("crawl.date_to", &self.crawl.date_to)?;
        if from > to {
            return Err(ConfigError::Invalid(format!(
                "crawl.date_from ({from}) is after crawl.date_to ({to})"
            )));
        }

        if self.crawl.page_size == 0 {
            return Err(ConfigError::Invalid("crawl.page_size must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }

        let delays = [
            ("list_delay", &self.politeness.list_delay),
            ("detail_delay", &self.politeness.detail_delay),
            ("image_delay", &self.politeness.image_delay),
        ];
        for (name, range) in delays {
            if !range.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "politeness.{name}: min_ms {} exceeds max_ms {}",
                    range.min_ms, range.max_ms
                )));
            }
        }

        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn default_config_content() -> &'static str {
        r##"# kliping configuration
#
# Command-line flags override the values below.

[crawl]
# Archive front-end root
base_url = "https://kliping.jogjakota.go.id/frontend"

# Published-date range to search (YYYY-MM-DD)
date_from = "2024-01-01"
date_to = "2025-12-31"

# Articles per list page; each page advances the offset by this much
page_size = 9

# Number of list pages to scan
max_pages = 1100

# Images, metadata.json and checkpoint.json are written here
output_dir = "output"

# Stop at the first list page without articles
stop_on_empty_page = false

[retry]
# Attempts per page load or download, including the first
max_attempts = 5

# Attempt n waits n * base_delay_ms before retrying
base_delay_ms = 3000

# Upper bound for a single attempt
operation_timeout_secs = 90

[politeness]
# Randomized pauses, in milliseconds
list_delay = { min_ms = 1500, max_ms = 3500 }
detail_delay = { min_ms = 1200, max_ms = 2700 }
image_delay = { min_ms = 400, max_ms = 1000 }

[browser]
headless = true
# executable = "/usr/bin/chromium"
navigation_timeout_secs = 60
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
accept_language = "id-ID,id;q=0.9,en-US;q=0.8"

[browser.selectors]
card = ".row-cards .card"
title_link = ".text-muted a"
source = ".d-flex a.text-default"
date = ".d-flex small"
image = "a.aimage-zoom img"
filename_attribute = "data-gambar_filename"
"##
    }
}

fn parse_range_date(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ConfigError::Invalid(format!("{field} {value:?} is not YYYY-MM-DD: {e}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::config::DelayRange;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(content).expect("Default config should be valid TOML");

        let defaults = Config::default();
        assert_eq!(config.crawl, defaults.crawl);
        assert_eq!(config.retry, defaults.retry);
        assert_eq!(config.politeness, defaults.politeness);
        assert_eq!(config.browser.user_agent, defaults.browser.user_agent);
        assert_eq!(config.browser.selectors, defaults.browser.selectors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[crawl]
date_from = "2023-06-01"

[politeness]
image_delay = { min_ms = 0, max_ms = 0 }
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.crawl.date_from, "2023-06-01");
        assert_eq!(config.crawl.page_size, 9);
        assert_eq!(config.politeness.image_delay, DelayRange::NONE);
        assert_eq!(config.politeness.list_delay, DelayRange::new(1500, 3500));
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.crawl.max_pages, 1100);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.crawl.date_from = "2025-01-01".to_string();
        config.crawl.date_to = "2024-01-01".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.crawl.date_to = "31/12/2025".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.crawl.base_url = "kliping/frontend".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.politeness.detail_delay = DelayRange::new(500, 100);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("detail_delay"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kliping.toml");
        fs::write(&path, "[crawl]\nmax_pages = 3\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.crawl.max_pages, 3);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));

        fs::write(&path, "[crawl\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
