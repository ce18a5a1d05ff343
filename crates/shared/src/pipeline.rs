use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::claude::ClaudeClient;
use crate::config::Config;
use crate::error::Result;
use crate::feeds::{collect_entries, FeedReader};
use crate::generator::{DraftGenerator, TextGenerator};
use crate::models::{DraftMetadata, FeedEntry};
use crate::selector::select_topic;
use crate::writer::{build_slug, DraftWriter};

/// What one run produced.
#[derive(Debug, Clone)]
pub struct DraftReport {
    pub path: PathBuf,
    pub metadata: DraftMetadata,
}

/// Fetch, select, generate, write. Everything but a failing feed is fatal.
pub async fn run(config: &Config) -> Result<DraftReport> {
    let reader = FeedReader::new()?;
    run_with_reader(config, &reader).await
}

pub async fn run_with_reader(config: &Config, reader: &FeedReader) -> Result<DraftReport> {
    let outcomes = reader.fetch_all(&config.feed_urls).await;
    let entries = collect_entries(outcomes);
    tracing::info!(
        "Collected {} entries from {} feeds",
        entries.len(),
        config.feed_urls.len()
    );

    let topic = select_topic(&entries, &config.focus_keywords)?;
    tracing::info!("Selected topic: {} ({})", topic.title, topic.link);

    let client = ClaudeClient::from_config(config)?;
    compose(config, &client, topic, Local::now().date_naive()).await
}

/// Generate and validate the draft, then write it. Nothing touches the
/// filesystem until the model output has been fully validated.
pub async fn compose<G>(
    config: &Config,
    generator: &G,
    topic: &FeedEntry,
    date: NaiveDate,
) -> Result<DraftReport>
where
    G: TextGenerator + ?Sized,
{
    let draft = DraftGenerator::from_config(config)
        .generate(generator, topic)
        .await?;

    let slug = build_slug(&draft.title, &topic.title, date);
    let path = DraftWriter::new(&config.output_dir).write(&slug, &draft.markdown)?;
    let metadata = DraftMetadata::new(&draft, slug, date, &topic.link);

    Ok(DraftReport { path, metadata })
}
