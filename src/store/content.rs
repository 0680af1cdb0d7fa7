use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::app::{ClippingError, Result};
use crate::store::atomic::write_atomic;

/// Size and SHA-256 of bytes written by [`ContentStore::persist`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    pub size: u64,
    pub hash: String,
}

/// Outcome of re-hashing a stored file against its recorded hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Intact,
    Missing,
    Drifted { actual: String },
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Writes downloaded images under `<root>/<year>/<filename>`
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn image_path(&self, year: &str, filename: &str) -> PathBuf {
        self.root.join(year).join(filename)
    }

    /// Write `bytes` to `target`, replacing any existing file
    pub fn persist(&self, bytes: &[u8], target: &Path) -> Result<StoredContent> {
        write_atomic(target, bytes).map_err(|e| ClippingError::Store {
            path: target.to_path_buf(),
            source: e,
        })?;

        Ok(StoredContent {
            size: bytes.len() as u64,
            hash: sha256_hex(bytes),
        })
    }

    /// Re-hash the file at `path`
    pub fn hash_file(path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        Ok(sha256_hex(&bytes))
    }

    /// Compare the file at `path` with `expected_hash`
    pub fn verify(path: &Path, expected_hash: &str) -> Result<Verification> {
        if !path.exists() {
            return Ok(Verification::Missing);
        }

        let actual = Self::hash_file(path)?;
        if actual.eq_ignore_ascii_case(expected_hash) {
            Ok(Verification::Intact)
        } else {
            Ok(Verification::Drifted { actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_persist_hash_matches_file() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().join("images"));
        let target = store.image_path("2024", "12-01-2024_foto.jpg");

        let stored = store.persist(b"\xff\xd8\xff\xe0jpeg", &target).unwrap();

        assert_eq!(stored.size, 8);
        assert_eq!(ContentStore::hash_file(&target).unwrap(), stored.hash);
        assert_eq!(
            ContentStore::verify(&target, &stored.hash).unwrap(),
            Verification::Intact
        );
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        let target = store.image_path("unknown", "x.jpg");

        store.persist(b"old", &target).unwrap();
        let stored = store.persist(b"new", &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(stored.hash, sha256_hex(b"new"));
    }

    #[test]
    fn test_verify_detects_drift_and_missing() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        let target = store.image_path("2024", "a.jpg");
        let stored = store.persist(b"original", &target).unwrap();

        fs::write(&target, b"tampered").unwrap();
        assert_eq!(
            ContentStore::verify(&target, &stored.hash).unwrap(),
            Verification::Drifted {
                actual: sha256_hex(b"tampered")
            }
        );

        fs::remove_file(&target).unwrap();
        assert_eq!(
            ContentStore::verify(&target, &stored.hash).unwrap(),
            Verification::Missing
        );
    }
}
