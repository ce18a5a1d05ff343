use std::env;
use std::path::PathBuf;

use crate::error::{DraftError, Result};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_OUTPUT_DIR: &str = "public/blog-posts";

pub const FEED_URLS: &[&str] = &[
    // General medicine / health news
    "https://www.sciencedaily.com/rss/health_medicine.xml",
    "https://www.medicalnewstoday.com/rss",
];

pub const FOCUS_KEYWORDS: &[&str] = &[
    "gallstones",
    "cholecystectomy",
    "post-cholecystectomy nutrition",
    "bile acids",
    "fat-soluble vitamins",
    "ERCP",
    "POCS",
    "fatty liver",
    "liver health",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub model: String,
    pub output_dir: PathBuf,
    pub feed_urls: Vec<String>,
    pub focus_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            feed_urls: FEED_URLS.iter().map(|s| s.to_string()).collect(),
            focus_keywords: FOCUS_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Build the run configuration from the environment. A missing API key is
    /// not an error here; it is only demanded once generation is reached.
    pub fn from_env() -> Self {
        Self::try_load_dotenv();

        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = env::var("CLAUDE_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let output_dir = env::var("BLOG_OUTPUT_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Self {
            anthropic_api_key,
            model,
            output_dir,
            ..Self::default()
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .ok_or(DraftError::MissingCredential)
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/blog-draft/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("blog-draft").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // None found is fine; variables may be set system-wide
    }
}
