use crate::error::{DraftError, Result};
use crate::models::FeedEntry;

/// Pick the first entry whose lower-cased title contains any focus keyword,
/// falling back to the first entry.
///
/// Matching is a raw substring test, not word-boundary aware: "ercp" also
/// matches inside a longer word. This is intentional.
pub fn select_topic<'a, S: AsRef<str>>(
    entries: &'a [FeedEntry],
    focus_keywords: &[S],
) -> Result<&'a FeedEntry> {
    let first = entries.first().ok_or(DraftError::NoEntriesAvailable)?;

    let focus: Vec<String> = focus_keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .collect();

    let selected = entries
        .iter()
        .find(|entry| {
            let title = entry.title.to_lowercase();
            focus.iter().any(|k| title.contains(k.as_str()))
        })
        .unwrap_or(first);

    Ok(selected)
}
