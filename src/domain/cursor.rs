use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of the last fully processed article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlCursor {
    #[serde(rename = "lastPage")]
    pub page_index: u32,
    #[serde(rename = "lastCard")]
    pub item_index: u32,
    #[serde(rename = "totalItems")]
    pub item_count: u64,
    #[serde(rename = "lastUpdated")]
    pub updated_at: DateTime<Utc>,
}

impl CrawlCursor {
    pub fn new(page_index: u32, item_index: u32, item_count: u64) -> Self {
        Self {
            page_index,
            item_index,
            item_count,
            updated_at: Utc::now(),
        }
    }

    /// First article index to process on `page`.
    ///
    /// Pages before the cursor's page have nothing left to do and report `None`.
    pub fn resume_index(&self, page: u32) -> Option<usize> {
        match page.cmp(&self.page_index) {
            std::cmp::Ordering::Less => None,
            std::cmp::Ordering::Equal => Some(self.item_index as usize + 1),
            std::cmp::Ordering::Greater => Some(0),
        }
    }
}
