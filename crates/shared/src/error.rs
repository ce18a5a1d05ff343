use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a draft run. Any of these aborts the run before the
/// markdown file is written.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("No feed entries available. Check the feed list or network.")]
    NoEntriesAvailable,

    #[error("Missing ANTHROPIC_API_KEY env var.")]
    MissingCredential,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Claude API error ({status}): {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Model output is not JSON.")]
    NotJson,

    #[error("Missing key in JSON: {0}")]
    MissingKey(&'static str),

    #[error("{key} must be a {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Failed to write draft to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single feed contributed no entries. Never fatal.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("not a valid RSS or Atom document: {0}")]
    Parse(String),
}

pub type Result<T, E = DraftError> = std::result::Result<T, E>;
