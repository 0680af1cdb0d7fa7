use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ArticleSummary;

/// Metadata for one downloaded image.
///
/// Key names on disk match the layout downstream tools already read
/// (`local_image`, `sha256`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub title: Option<String>,
    #[serde(rename = "date")]
    pub published_date_raw: Option<String>,
    #[serde(rename = "media")]
    pub source: Option<String>,
    pub detail_url: String,
    pub image_url: String,
    #[serde(rename = "local_image")]
    pub local_path: PathBuf,
    #[serde(rename = "size")]
    pub byte_size: u64,
    #[serde(rename = "sha256")]
    pub content_hash: String,
    #[serde(rename = "scraped_at")]
    pub retrieved_at: DateTime<Utc>,
}

impl AssetRecord {
    pub fn new(
        article: &ArticleSummary,
        detail_url: &str,
        image_url: &str,
        local_path: PathBuf,
        byte_size: u64,
        content_hash: String,
    ) -> Self {
        Self {
            title: article.title.clone(),
            published_date_raw: article.published_date_raw.clone(),
            source: article.source.clone(),
            detail_url: detail_url.to_string(),
            image_url: image_url.to_string(),
            local_path,
            byte_size,
            content_hash,
            retrieved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_downstream_key_names() {
        let article = ArticleSummary {
            title: Some("Judul".into()),
            detail_url: Some("https://example.com/d/1".into()),
            source: Some("Harian Jogja".into()),
            published_date_raw: Some("3 Maret 2024".into()),
        };
        let record = AssetRecord::new(
            &article,
            "https://example.com/d/1",
            "https://example.com/i/1.jpg",
            PathBuf::from("output/images/2024/03-03-2024_1.jpg"),
            42,
            "ab".repeat(32),
        );

        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "title",
            "date",
            "media",
            "detail_url",
            "image_url",
            "local_image",
            "size",
            "sha256",
            "scraped_at",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["media"], "Harian Jogja");
        assert_eq!(value["size"], 42);
    }
}
