use html2text::render::text_renderer::TrivialDecorator;
use reqwest::Client;
use url::Url;

use crate::error::FeedError;
use crate::models::FeedEntry;

/// Only the first items of each feed are considered.
pub const MAX_ENTRIES_PER_FEED: usize = 20;

// Summaries are flattened to a single line, so wrapping must never kick in.
const TEXT_WIDTH: usize = 10_000;

/// Result of reading one feed. Failures stay attached to their URL so the
/// caller can report them without aborting the run.
#[derive(Debug)]
pub enum FeedOutcome {
    Fetched { url: String, entries: Vec<FeedEntry> },
    Failed { url: String, error: FeedError },
}

impl FeedOutcome {
    pub fn url(&self) -> &str {
        match self {
            FeedOutcome::Fetched { url, .. } | FeedOutcome::Failed { url, .. } => url,
        }
    }
}

/// Concatenate the entries of every successful feed, in feed order.
pub fn collect_entries(outcomes: Vec<FeedOutcome>) -> Vec<FeedEntry> {
    outcomes
        .into_iter()
        .flat_map(|outcome| match outcome {
            FeedOutcome::Fetched { entries, .. } => entries,
            FeedOutcome::Failed { .. } => Vec::new(),
        })
        .collect()
}

pub struct FeedReader {
    client: Client,
}

impl FeedReader {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; BlogDraft/1.0)")
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Read every feed one after another. A failing feed is logged and
    /// contributes nothing.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FeedOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());

        for url in urls {
            let outcome = match self.fetch_feed(url).await {
                Ok(entries) => {
                    tracing::info!("Fetched {} entries from {}", entries.len(), url);
                    FeedOutcome::Fetched {
                        url: url.clone(),
                        entries,
                    }
                }
                Err(error) => {
                    tracing::warn!("Failed feed: {} -> {}", url, error);
                    FeedOutcome::Failed {
                        url: url.clone(),
                        error,
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
        tracing::debug!("Fetching feed from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.bytes().await?;
        parse_feed(&body, url)
    }
}

/// Parse an RSS 2.0 or Atom document into feed entries.
pub fn parse_feed(body: &[u8], feed_url: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let raw = match rss::Channel::read_from(body) {
        Ok(channel) => channel
            .items()
            .iter()
            .take(MAX_ENTRIES_PER_FEED)
            .map(|item| RawEntry {
                title: item.title().unwrap_or_default(),
                link: item.link().unwrap_or_default(),
                summary: item.description().or(item.content()).unwrap_or_default(),
            })
            .map(|raw| raw.into_entry(feed_url))
            .collect::<Vec<_>>(),
        Err(rss_err) => {
            let feed = atom_syndication::Feed::read_from(body).map_err(|atom_err| {
                FeedError::Parse(format!("rss: {}; atom: {}", rss_err, atom_err))
            })?;
            feed.entries()
                .iter()
                .take(MAX_ENTRIES_PER_FEED)
                .map(|entry| RawEntry {
                    title: entry.title().value.as_str(),
                    link: atom_link(entry),
                    summary: entry
                        .summary()
                        .map(|s| s.value.as_str())
                        .or_else(|| entry.content().and_then(|c| c.value()))
                        .unwrap_or_default(),
                })
                .map(|raw| raw.into_entry(feed_url))
                .collect::<Vec<_>>()
        }
    };

    Ok(raw.into_iter().flatten().collect())
}

fn atom_link(entry: &atom_syndication::Entry) -> &str {
    entry
        .links()
        .iter()
        .find(|link| link.rel() == "alternate")
        .or_else(|| entry.links().first())
        .map(|link| link.href())
        .unwrap_or_default()
}

struct RawEntry<'a> {
    title: &'a str,
    link: &'a str,
    summary: &'a str,
}

impl RawEntry<'_> {
    /// Entries without a title or link are dropped.
    fn into_entry(self, feed_url: &str) -> Option<FeedEntry> {
        let title = self.title.trim();
        let link = self.link.trim();
        if title.is_empty() || link.is_empty() {
            return None;
        }

        Some(FeedEntry {
            title: title.to_string(),
            link: resolve_link(feed_url, link),
            summary: plain_text(self.summary),
            source_feed: feed_url.to_string(),
        })
    }
}

// Relative links are resolved against the feed URL.
fn resolve_link(feed_url: &str, link: &str) -> String {
    if Url::parse(link).is_ok() {
        return link.to_string();
    }
    Url::parse(feed_url)
        .and_then(|base| base.join(link))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| link.to_string())
}

/// Strip markup and collapse every whitespace run to a single space.
pub fn plain_text(summary: &str) -> String {
    let summary = summary.trim();
    if summary.is_empty() {
        return String::new();
    }
    let text = if summary.contains('<') {
        // Trivial decoration keeps link text but drops link markers and footnotes
        html2text::from_read_with_decorator(
            summary.as_bytes(),
            TEXT_WIDTH,
            TrivialDecorator::new(),
        )
    } else {
        summary.to_string()
    };
    normalize_whitespace(&text)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{no_proxy_client, serve_once};

    const FEED: &str = "https://example.com/rss";

    fn rss_doc(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Health</title><link>https://example.com</link>
<description>News</description>{}</channel></rss>"#,
            items
        )
    }

    fn rss_item(title: &str, link: &str, description: &str) -> String {
        format!(
            "<item><title>{}</title><link>{}</link><description>{}</description></item>",
            title, link, description
        )
    }

    #[test]
    fn test_parse_rss_entries_in_order() {
        let doc = rss_doc(&format!(
            "{}{}",
            rss_item("Flu season update", "https://a.com/1", "First"),
            rss_item("New gallstones study", "https://a.com/2", "Second")
        ));

        let entries = parse_feed(doc.as_bytes(), FEED).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Flu season update");
        assert_eq!(entries[1].link, "https://a.com/2");
        assert_eq!(entries[1].source_feed, FEED);
    }

    #[test]
    fn test_parse_rss_drops_entries_without_title_or_link() {
        let doc = rss_doc(&format!(
            "{}{}{}",
            rss_item("", "https://a.com/1", "no title"),
            "<item><title>No link</title></item>",
            rss_item("Kept", "https://a.com/3", "ok")
        ));

        let entries = parse_feed(doc.as_bytes(), FEED).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Kept");
    }

    #[test]
    fn test_parse_rss_caps_at_twenty_items() {
        let items: String = (0..30)
            .map(|i| rss_item(&format!("Story {}", i), &format!("https://a.com/{}", i), ""))
            .collect();

        let entries = parse_feed(rss_doc(&items).as_bytes(), FEED).unwrap();

        assert_eq!(entries.len(), MAX_ENTRIES_PER_FEED);
        assert_eq!(entries.last().unwrap().title, "Story 19");
    }

    #[test]
    fn test_parse_rss_normalizes_summary_whitespace() {
        let doc = rss_doc(&rss_item(
            "Title",
            "https://a.com/1",
            "  Bile   acids\n\n and\tfat-soluble  vitamins  ",
        ));

        let entries = parse_feed(doc.as_bytes(), FEED).unwrap();

        assert_eq!(entries[0].summary, "Bile acids and fat-soluble vitamins");
    }

    #[test]
    fn test_parse_rss_strips_html_summary() {
        let doc = rss_doc(&rss_item(
            "Title",
            "https://a.com/1",
            r#"<![CDATA[<p>Researchers at <a href="https://x.org/long/path/to/study">Big University</a> found <b>bile acids</b> matter.</p>]]>"#,
        ));

        let entries = parse_feed(doc.as_bytes(), FEED).unwrap();

        assert_eq!(
            entries[0].summary,
            "Researchers at Big University found bile acids matter."
        );
    }

    #[test]
    fn test_plain_text_drops_link_footnotes() {
        let text = plain_text(
            r#"<p>See <a href="https://x.org/a">the study</a> and <a href="https://x.org/b">the review</a>.</p>"#,
        );

        assert_eq!(text, "See the study and the review.");
    }

    #[test]
    fn test_parse_rss_resolves_relative_links() {
        let doc = rss_doc(&rss_item("Title", "/stories/42", ""));

        let entries = parse_feed(doc.as_bytes(), "https://example.com/feeds/rss").unwrap();

        assert_eq!(entries[0].link, "https://example.com/stories/42");
    }

    #[test]
    fn test_parse_atom_feed() {
        let doc = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Liver news</title>
  <id>urn:uuid:feed</id>
  <updated>2024-06-01T00:00:00Z</updated>
  <entry>
    <title>Fatty liver on the rise</title>
    <id>urn:uuid:1</id>
    <updated>2024-06-01T00:00:00Z</updated>
    <link rel="self" href="https://a.com/self"/>
    <link rel="alternate" href="https://a.com/fatty-liver"/>
    <summary>Short   summary</summary>
  </entry>
</feed>"#;

        let entries = parse_feed(doc.as_bytes(), FEED).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Fatty liver on the rise");
        assert_eq!(entries[0].link, "https://a.com/fatty-liver");
        assert_eq!(entries[0].summary, "Short summary");
    }

    #[test]
    fn test_parse_malformed_feed_is_error() {
        let result = parse_feed(b"<html><body>not a feed</body></html>", FEED);
        assert!(matches!(result, Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_collect_entries_skips_failed_feeds() {
        let entry = FeedEntry {
            title: "Kept".to_string(),
            link: "https://a.com".to_string(),
            summary: String::new(),
            source_feed: FEED.to_string(),
        };
        let outcomes = vec![
            FeedOutcome::Failed {
                url: "https://broken.example".to_string(),
                error: FeedError::Parse("bad".to_string()),
            },
            FeedOutcome::Fetched {
                url: FEED.to_string(),
                entries: vec![entry.clone()],
            },
        ];

        assert_eq!(collect_entries(outcomes), vec![entry]);
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failing_feeds() {
        let good = serve_once(
            "200 OK",
            "application/rss+xml",
            rss_doc(&rss_item("Gallstones", "https://a.com/1", "ok")),
        )
        .await;
        let bad = serve_once("200 OK", "text/html", "<html>nope</html>".to_string()).await;
        let missing = serve_once("404 Not Found", "text/plain", "gone".to_string()).await;
        let closed = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let reader = FeedReader::with_client(no_proxy_client());
        let urls = vec![
            format!("{}/bad.xml", bad.base_url),
            format!("{}/missing.xml", missing.base_url),
            format!("http://{}/unreachable.xml", closed),
            format!("{}/good.xml", good.base_url),
        ];
        let outcomes = reader.fetch_all(&urls).await;

        assert_eq!(outcomes.len(), 4);
        assert!(matches!(outcomes[0], FeedOutcome::Failed { error: FeedError::Parse(_), .. }));
        assert!(matches!(outcomes[1], FeedOutcome::Failed { error: FeedError::Status(_), .. }));
        assert!(matches!(outcomes[2], FeedOutcome::Failed { error: FeedError::Http(_), .. }));
        assert_eq!(outcomes[3].url(), urls[3]);

        let entries = collect_entries(outcomes);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Gallstones");
        assert_eq!(entries[0].source_feed, urls[3]);
    }
}
