use serde::{Deserialize, Serialize};

/// One card on a list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub title: Option<String>,
    pub detail_url: Option<String>,
    pub source: Option<String>,
    pub published_date_raw: Option<String>,
}

impl ArticleSummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(Untitled)")
    }
}

/// An image embedded in an article's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub source_url: String,
    #[serde(default)]
    pub suggested_filename: Option<String>,
}

impl ImageDescriptor {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            suggested_filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.suggested_filename = Some(filename.into());
        self
    }
}
