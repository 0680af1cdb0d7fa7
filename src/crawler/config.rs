use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// `[crawl]` section: what to traverse and where to write it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Archive front-end root, without a trailing slash
    pub base_url: String,

    /// First published date of the search range (YYYY-MM-DD)
    pub date_from: String,

    /// Last published date of the search range (YYYY-MM-DD)
    pub date_to: String,

    /// Articles per list page; the list URL offset advances by this much (default: 9)
    pub page_size: u32,

    /// Number of list pages to scan (default: 1100)
    pub max_pages: u32,

    /// Root for images, metadata and checkpoint (default: `output`)
    pub output_dir: PathBuf,

    /// End the crawl at the first list page without articles (default: false)
    pub stop_on_empty_page: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://kliping.jogjakota.go.id/frontend".to_string(),
            date_from: "2024-01-01".to_string(),
            date_to: "2025-12-31".to_string(),
            page_size: 9,
            max_pages: 1100,
            output_dir: PathBuf::from("output"),
            stop_on_empty_page: false,
        }
    }
}

impl CrawlConfig {
    /// Search-result URL for zero-based list page `page`
    pub fn list_url(&self, page: u32) -> String {
        let offset = if page == 0 {
            String::new()
        } else {
            format!("/{}", u64::from(page) * u64::from(self.page_size))
        };

        format!(
            "{}/home/cari/{}/{}/all/all/all/null{}",
            self.base_url.trim_end_matches('/'),
            self.date_from,
            self.date_to,
            offset
        )
    }
}

/// Inclusive range for a randomized pause, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const NONE: DelayRange = DelayRange {
        min_ms: 0,
        max_ms: 0,
    };

    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }

    pub fn sample(&self) -> Duration {
        let ms = if self.max_ms > self.min_ms {
            rand::rng().random_range(self.min_ms..=self.max_ms)
        } else {
            self.min_ms
        };
        Duration::from_millis(ms)
    }

    /// Sleep for a sampled duration
    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// `[politeness]` section: pauses between requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    /// Before opening each list page
    pub list_delay: DelayRange,
    /// Before opening each article's detail page
    pub detail_delay: DelayRange,
    /// After each image download
    pub image_delay: DelayRange,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            list_delay: DelayRange::new(1500, 3500),
            detail_delay: DelayRange::new(1200, 2700),
            image_delay: DelayRange::new(400, 1000),
        }
    }
}

impl PolitenessConfig {
    pub fn none() -> Self {
        Self {
            list_delay: DelayRange::NONE,
            detail_delay: DelayRange::NONE,
            image_delay: DelayRange::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_offset() {
        let config = CrawlConfig::default();
        assert_eq!(
            config.list_url(0),
            "https://kliping.jogjakota.go.id/frontend/home/cari/2024-01-01/2025-12-31/all/all/all/null"
        );
    }

    #[test]
    fn test_later_pages_offset_by_page_size() {
        let config = CrawlConfig {
            base_url: "https://example.com/frontend/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.list_url(3),
            "https://example.com/frontend/home/cari/2024-01-01/2025-12-31/all/all/all/null/27"
        );
    }

    #[test]
    fn test_delay_sample_within_bounds() {
        let range = DelayRange::new(10, 20);
        for _ in 0..100 {
            let d = range.sample();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
        assert_eq!(DelayRange::new(7, 7).sample(), Duration::from_millis(7));
        assert_eq!(DelayRange::NONE.sample(), Duration::ZERO);
    }

    #[test]
    fn test_politeness_defaults() {
        let config = PolitenessConfig::default();
        assert_eq!(config.list_delay, DelayRange::new(1500, 3500));
        assert!(config.image_delay.is_valid());
        assert!(!DelayRange::new(5, 1).is_valid());
    }
}
