//! Persistent crawl cursor.
//!
//! One JSON object, replaced atomically on every save and removed once a
//! crawl has walked its whole page range.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::app::{ClippingError, Result};
use crate::domain::CrawlCursor;
use crate::store::write_atomic;

#[derive(Debug, Clone)]
pub struct CheckpointLedger {
    path: PathBuf,
}

impl CheckpointLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last saved cursor. Missing or unreadable checkpoints mean a fresh run.
    pub fn load(&self) -> Option<CrawlCursor> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice::<CrawlCursor>(&bytes) {
            Ok(cursor) => Some(cursor),
            Err(e) => {
                warn!(
                    "Ignoring corrupt checkpoint {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn save(&self, cursor: &CrawlCursor) -> Result<()> {
        let json = serde_json::to_vec_pretty(cursor)?;
        write_atomic(&self.path, &json).map_err(|e| ClippingError::Store {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(
            page = cursor.page_index,
            item = cursor.item_index,
            total = cursor.item_count,
            "Checkpoint saved"
        );
        Ok(())
    }

    /// Remove the checkpoint; absent is fine
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
