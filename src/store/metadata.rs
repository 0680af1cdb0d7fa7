use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::app::{ClippingError, Result};
use crate::domain::{AssetRecord, CrawlCursor};
use crate::store::atomic::write_atomic;

/// Read every record from a metadata file; a missing file has none
pub fn load_records(path: &Path) -> Result<Vec<AssetRecord>> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Append-only sequence of [`AssetRecord`]s mirrored to a JSON array on disk.
///
/// The whole array is rewritten after each append. If the log is dropped
/// before [`finalize`](Self::finalize) ran (panic, task cancellation), the
/// drop flushes it one last time.
#[derive(Debug)]
pub struct AssetLog {
    path: PathBuf,
    records: Vec<AssetRecord>,
    finalized: bool,
}

impl AssetLog {
    /// Start an empty log at `path`
    pub fn fresh(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            finalized: false,
        }
    }

    /// Reopen the log written by an interrupted run.
    ///
    /// Records beyond `cursor.item_count` belong to an article that never
    /// completed; they are dropped so the article can be redone cleanly.
    pub fn resume(path: impl Into<PathBuf>, cursor: &CrawlCursor) -> Result<Self> {
        let path = path.into();
        let mut records = load_records(&path)?;

        let keep = usize::try_from(cursor.item_count).unwrap_or(usize::MAX);
        if records.len() > keep {
            warn!(
                "Dropping {} records from an unfinished article",
                records.len() - keep
            );
            records.truncate(keep);
        } else if records.len() < keep {
            warn!(
                "Checkpoint expects {} records but {} holds {}",
                keep,
                path.display(),
                records.len()
            );
        }

        info!("Resuming with {} existing records", records.len());

        Ok(Self {
            path,
            records,
            finalized: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Add a record and rewrite the file
    pub fn append(&mut self, record: AssetRecord) -> Result<()> {
        self.records.push(record);
        self.persist()
    }

    /// Rewrite the file with the current records
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.records)?;
        write_atomic(&self.path, &json).map_err(|e| ClippingError::Store {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Final write for this run; the drop guard is disarmed afterwards
    pub fn finalize(&mut self) -> Result<()> {
        self.finalized = true;
        self.persist()
    }
}

impl Drop for AssetLog {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        match self.persist() {
            Ok(()) => warn!(
                "Crawl ended abnormally; flushed {} records to {}",
                self.records.len(),
                self.path.display()
            ),
            Err(e) => error!("Failed to flush metadata on abnormal exit: {}", e),
        }
    }
}
