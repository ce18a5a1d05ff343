use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{DraftError, Result};
use crate::models::{DraftResult, FeedEntry};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

pub const MAX_TOKENS: u32 = 2200;
pub const TEMPERATURE: f32 = 0.4;

const REQUIRED_KEYS: [&str; 4] = ["title", "excerpt", "tags", "markdown"];

/// One completion request to a text model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A text model that turns one request into the concatenated text of its
/// response. Called exactly once per run, without retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

pub struct DraftGenerator {
    model: String,
    focus_keywords: Vec<String>,
}

impl DraftGenerator {
    pub fn new(model: impl Into<String>, focus_keywords: Vec<String>) -> Self {
        Self {
            model: model.into(),
            focus_keywords,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.model.clone(), config.focus_keywords.clone())
    }

    pub fn request_for(&self, topic: &FeedEntry) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_user_prompt(topic, &self.focus_keywords),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    pub async fn generate<G>(&self, generator: &G, topic: &FeedEntry) -> Result<DraftResult>
    where
        G: TextGenerator + ?Sized,
    {
        let request = self.request_for(topic);
        tracing::info!("Generating draft with {} for: {}", request.model, topic.title);

        let text = generator.generate(&request).await?;
        let object = extract_json_object(&text)?;
        parse_draft(object)
    }
}

/// Parse the model output as a JSON object: first the whole text, then the
/// span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    let text = text.trim();

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) {
        return Ok(object);
    }

    let start = text.find('{').ok_or(DraftError::NotJson)?;
    let end = text.rfind('}').ok_or(DraftError::NotJson)?;
    if end < start {
        return Err(DraftError::NotJson);
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(DraftError::NotJson),
    }
}

/// Check the required keys and their types.
pub fn parse_draft(mut object: Map<String, Value>) -> Result<DraftResult> {
    if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !object.contains_key(**k)) {
        return Err(DraftError::MissingKey(*missing));
    }

    let tags = match object.remove("tags") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(tag) => Ok(tag),
                _ => Err(DraftError::WrongType {
                    key: "tags",
                    expected: "list of strings",
                }),
            })
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(DraftError::WrongType {
                key: "tags",
                expected: "list",
            })
        }
    };

    Ok(DraftResult {
        title: take_string(&mut object, "title")?,
        excerpt: take_string(&mut object, "excerpt")?,
        tags,
        markdown: take_string(&mut object, "markdown")?,
    })
}

fn take_string(object: &mut Map<String, Value>, key: &'static str) -> Result<String> {
    match object.remove(key) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(DraftError::WrongType {
            key,
            expected: "string",
        }),
        None => Err(DraftError::MissingKey(key)),
    }
}
