use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// CSS selectors used by the in-page extraction scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per article on a list page
    pub card: String,
    /// Anchor holding the title and the detail link, relative to the card
    pub title_link: String,
    /// Publication name, relative to the card
    pub source: String,
    /// Raw published date text, relative to the card
    pub date: String,
    /// Images on the detail page
    pub image: String,
    /// `data-*` attribute on the image's enclosing anchor with the original filename
    pub filename_attribute: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: ".row-cards .card".to_string(),
            title_link: ".text-muted a".to_string(),
            source: ".d-flex a.text-default".to_string(),
            date: ".d-flex small".to_string(),
            image: "a.aimage-zoom img".to_string(),
            filename_attribute: "data-gambar_filename".to_string(),
        }
    }
}

/// Configuration for the Chrome page driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Chrome/Chromium binary; detected automatically when unset
    pub executable: Option<PathBuf>,

    /// CDP request and navigation timeout in seconds (default: 60)
    pub navigation_timeout_secs: u64,

    /// User agent string to use
    pub user_agent: Option<String>,

    /// Accept-Language header sent with every request
    pub accept_language: Option<String>,

    pub selectors: SelectorConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            navigation_timeout_secs: 60,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            accept_language: Some("id-ID,id;q=0.9,en-US;q=0.8".to_string()),
            selectors: SelectorConfig::default(),
        }
    }
}

impl DriverConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}
