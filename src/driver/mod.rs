//! Page driver boundary.
//!
//! The crawl engine never talks to a browser directly. It asks a
//! [`PageDriver`] to open a URL and hand back either the article cards of a
//! list page or the images of a detail page, and to fetch image bytes inside
//! the same browser session so that cookies apply.
//!
//! ```text
//! Crawler → RetryGovernor → PageDriver (ChromeDriver | test double)
//! ```
//!
//! Failures cross this boundary as [`DriverError`] carrying a closed
//! [`DriverErrorKind`], which the retry governor dispatches on.

mod chrome;
mod config;
mod error;
mod extractor;

#[cfg(test)]
pub mod testing;

pub use chrome::ChromeDriver;
pub use config::{DriverConfig, SelectorConfig};
pub use error::{DriverError, DriverErrorKind};
pub use extractor::ExtractionScripts;

use async_trait::async_trait;

use crate::domain::{ArticleSummary, ImageDescriptor};

/// What to pull out of a page after navigating to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Article cards of a search-result page
    Articles,
    /// Embedded images of an article's detail page
    Images,
}

/// Structured fields extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Articles(Vec<ArticleSummary>),
    Images(Vec<ImageDescriptor>),
}

impl Extraction {
    pub fn into_articles(self) -> Result<Vec<ArticleSummary>, DriverError> {
        match self {
            Extraction::Articles(articles) => Ok(articles),
            Extraction::Images(_) => Err(DriverError::extraction(
                "expected article cards, driver returned images",
            )),
        }
    }

    pub fn into_images(self) -> Result<Vec<ImageDescriptor>, DriverError> {
        match self {
            Extraction::Images(images) => Ok(images),
            Extraction::Articles(_) => Err(DriverError::extraction(
                "expected images, driver returned article cards",
            )),
        }
    }
}

/// Browser session capability used by the crawler
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url` and extract the fields selected by `mode`
    async fn navigate_and_extract(
        &self,
        url: &str,
        mode: ExtractMode,
    ) -> Result<Extraction, DriverError>;

    /// Fetch raw bytes from `url` with the session's credentials
    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, DriverError>;

    /// Release the session. Further calls are not expected.
    async fn close(&mut self) -> Result<(), DriverError>;
}
