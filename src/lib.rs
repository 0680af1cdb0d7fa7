//! # kliping
//!
//! A resumable crawler that collects every newspaper-clipping image from a
//! municipal news-clipping archive, together with a metadata file describing
//! each image.
//!
//! ## Architecture
//!
//! ```text
//! list page → detail page → image bytes → ContentStore + AssetLog
//!                 ↑ every step runs through the RetryGovernor
//! ```
//!
//! Progress is checkpointed after each article so an interrupted crawl
//! resumes where it stopped.
//!
//! ## Quick Start
//!
//! ```bash
//! # Crawl (or resume) the default date range
//! kliping crawl
//!
//! # Crawl a narrower range into another directory
//! kliping --output clips crawl --from 2024-01-01 --to 2024-03-31
//!
//! # Inspect progress and check stored files
//! kliping status
//! kliping verify
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`checkpoint`]: Persistent crawl cursor
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`crawler`]: Crawl traversal and supervision
//! - [`domain`]: Articles, images, records and the cursor
//! - [`driver`]: Browser page driver
//! - [`naming`]: Image file naming
//! - [`retry`]: Retry with timeout and backoff
//! - [`store`]: Image files and the metadata log

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) holds the validated configuration and the
/// output layout used by every command.
pub mod app;

/// Persistent crawl cursor, written atomically after every article.
pub mod checkpoint;

/// Command-line interface using clap.
///
/// - `crawl` - Run or resume the crawl
/// - `status` - Show the checkpoint and record count
/// - `verify` - Re-hash stored images
/// - `reset` - Delete the checkpoint
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/kliping/config.toml` with `[crawl]`, `[retry]`,
/// `[politeness]` and `[browser]` sections.
pub mod config;

/// Crawl orchestration.
///
/// - [`Crawler`](crawler::Crawler): Sequential page/article/image traversal
/// - [`supervise`](crawler::supervise): Panic and Ctrl-C handling
pub mod crawler;

/// Core domain models.
pub mod domain;

/// Browser automation.
///
/// - [`PageDriver`](driver::PageDriver): Async trait the crawler drives
/// - [`ChromeDriver`](driver::ChromeDriver): chromiumoxide implementation
pub mod driver;

pub mod naming;

/// Timeout, classification and linear backoff around driver calls.
pub mod retry;

/// Image files with their SHA-256 digests and the append-only metadata log.
pub mod store;
