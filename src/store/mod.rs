//! On-disk outputs of a crawl: image files and the metadata array.

pub mod atomic;
pub mod content;
pub mod metadata;

pub use atomic::write_atomic;
pub use content::{sha256_hex, ContentStore, StoredContent, Verification};
pub use metadata::{load_records, AssetLog};
