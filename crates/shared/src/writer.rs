use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::error::{DraftError, Result};

pub const SLUG_MAX_LEN: usize = 60;
pub const FALLBACK_SLUG: &str = "post";

/// ASCII, lower-case, hyphenated form of `text`, at most 60 characters.
pub fn slugify(text: &str) -> String {
    let slug = slug::slugify(text);
    // slug output is pure ASCII, so byte truncation is safe
    let truncated = &slug[..slug.len().min(SLUG_MAX_LEN)];
    truncated.trim_end_matches('-').to_string()
}

/// `YYYY-MM-DD-<base>`, where base comes from the draft title, then the
/// source headline, then the literal "post".
pub fn build_slug(title: &str, headline: &str, date: NaiveDate) -> String {
    let base = [slugify(title), slugify(headline)]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_SLUG.to_string());

    format!("{}-{}", date.format("%Y-%m-%d"), base)
}

pub struct DraftWriter {
    output_dir: PathBuf,
}

impl DraftWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `<output_dir>/<slug>.md`, replacing any existing file.
    pub fn write(&self, slug: &str, markdown: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|source| DraftError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(format!("{}.md", slug));
        let content = format!("{}\n", markdown.trim());

        fs::write(&path, content).map_err(|source| DraftError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Wrote draft to {}", path.display());
        Ok(path)
    }
}
