use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound on tags carried into the metadata snippet.
pub const MAX_METADATA_TAGS: usize = 6;

/// One headline pulled from a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub source_feed: String,
}

/// Structured fields extracted from the model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftResult {
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub markdown: String,
}

/// Metadata snippet printed for the blog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMetadata {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub date: String,
    pub tags: Vec<String>,
    pub source_url: String,
}

impl DraftMetadata {
    pub fn new(
        draft: &DraftResult,
        slug: impl Into<String>,
        date: NaiveDate,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            title: draft.title.clone(),
            slug: slug.into(),
            excerpt: draft.excerpt.clone(),
            date: date.format("%Y-%m-%d").to_string(),
            tags: draft.tags.iter().take(MAX_METADATA_TAGS).cloned().collect(),
            source_url: source_url.into(),
        }
    }
}
