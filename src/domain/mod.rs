pub mod article;
pub mod asset;
pub mod cursor;

pub use article::{ArticleSummary, ImageDescriptor};
pub use asset::AssetRecord;
pub use cursor::CrawlCursor;
