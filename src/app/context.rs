use std::path::{Path, PathBuf};

use crate::app::error::Result;
use crate::checkpoint::CheckpointLedger;
use crate::config::Config;
use crate::store::ContentStore;

/// Files a crawl reads and writes under its output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub root: PathBuf,
    pub images: PathBuf,
    pub metadata: PathBuf,
    pub checkpoint: PathBuf,
}

impl OutputPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            images: root.join("images"),
            metadata: root.join("metadata.json"),
            checkpoint: root.join("checkpoint.json"),
            root,
        }
    }
}

pub struct AppContext {
    pub config: Config,
    pub paths: OutputPaths,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let paths = OutputPaths::new(&config.crawl.output_dir);
        Ok(Self { config, paths })
    }

    pub fn ledger(&self) -> CheckpointLedger {
        CheckpointLedger::new(&self.paths.checkpoint)
    }

    pub fn content_store(&self) -> ContentStore {
        ContentStore::new(&self.paths.images)
    }
}
