//! Crawl engine.
//!
//! [`Crawler`] walks search-result pages, visits each article's detail page
//! and stores every image it finds, checkpointing after each article.
//! [`supervise`] runs it on a separate task so that panics and Ctrl-C still
//! leave a consistent checkpoint and metadata file behind.

pub mod config;
mod orchestrator;
mod supervisor;

pub use config::{CrawlConfig, DelayRange, PolitenessConfig};
pub use orchestrator::{CrawlSummary, Crawler};
pub use supervisor::{supervise, supervise_until};
