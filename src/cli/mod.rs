pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "kliping")]
#[command(about = "Resumable image crawler for a news-clipping archive", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/kliping/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory for images, metadata and checkpoint
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the crawl, resuming from the checkpoint if one exists
    Crawl(CrawlArgs),
    /// Show the checkpoint and the number of recorded images
    Status,
    /// Re-hash stored images and compare them with the metadata
    Verify,
    /// Delete the checkpoint so the next crawl starts from the first page
    Reset,
}

#[derive(Args, Debug, Default)]
pub struct CrawlArgs {
    /// First published date to search (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last published date to search (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Number of list pages to scan
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Articles per list page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chrome/Chromium binary to launch
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// Attempts per page load or download
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Discard the checkpoint and start from the first page
    #[arg(long)]
    pub fresh: bool,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref output) = self.output {
            config.crawl.output_dir = output.clone();
        }
        if let Commands::Crawl(ref args) = self.command {
            args.apply(config);
        }
    }
}

impl CrawlArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref from) = self.from {
            config.crawl.date_from = from.clone();
        }
        if let Some(ref to) = self.to {
            config.crawl.date_to = to.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.crawl.max_pages = max_pages;
        }
        if let Some(page_size) = self.page_size {
            config.crawl.page_size = page_size;
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(ref chrome) = self.chrome {
            config.browser.executable = Some(chrome.clone());
        }
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
    }
}
