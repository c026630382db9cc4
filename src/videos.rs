//! Video recommendations from the YouTube Data API.
//!
//! The lookup is best-effort. A missing API key turns the feature off
//! ([`VideoOutcome::Disabled`]), and any transport or decode failure becomes
//! [`VideoOutcome::Failed`]. Neither one touches the legislative results.

use crate::config::{YoutubeSettings, endpoint};
use crate::error::SourceError;
use crate::models::{VideoLink, VideoOutcome};
use crate::sources::fetch_json;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Anything that can recommend videos for a topic.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn recommend(&self, topic: &str) -> VideoOutcome;
}

#[derive(Debug)]
pub struct YoutubeClient {
    client: Client,
    api_key: Option<String>,
    settings: YoutubeSettings,
}

impl YoutubeClient {
    /// An empty or whitespace key counts as no key.
    pub fn new(client: Client, api_key: Option<String>, settings: YoutubeSettings) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self {
            client,
            api_key,
            settings,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn query_for(&self, topic: &str) -> String {
        let suffix = self.settings.query_suffix.trim();
        if suffix.is_empty() {
            topic.trim().to_string()
        } else {
            format!("{} {}", topic.trim(), suffix)
        }
    }

    async fn fetch(&self, key: &str, topic: &str) -> Result<Vec<VideoLink>, SourceError> {
        let url = endpoint(&self.settings.base, "search");
        let max_results = self.settings.max_results.to_string();
        let q = self.query_for(topic);
        let request = self.client.get(&url).query(&[
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("q", q.as_str()),
            ("key", key),
        ]);
        let response: SearchListResponse = fetch_json(request).await?;
        Ok(response.into_links())
    }
}

#[async_trait]
impl VideoSearch for YoutubeClient {
    #[instrument(level = "info", skip(self))]
    async fn recommend(&self, topic: &str) -> VideoOutcome {
        let Some(key) = self.api_key.as_deref() else {
            info!("No YouTube API key configured; video recommendations disabled");
            return VideoOutcome::Disabled;
        };
        match self.fetch(key, topic).await {
            Ok(links) if links.is_empty() => VideoOutcome::Empty,
            Ok(links) => {
                info!(count = links.len(), "Fetched video recommendations");
                VideoOutcome::Found(links)
            }
            Err(e) => {
                warn!(error = %e, "Video lookup failed; continuing without videos");
                VideoOutcome::Failed(e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    id: ResourceId,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

impl SearchListResponse {
    /// Keep API ranking order; skip results that are not videos.
    fn into_links(self) -> Vec<VideoLink> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id.filter(|id| !id.is_empty())?;
                let raw_title = item.snippet.map(|s| s.title).unwrap_or_default();
                Some(VideoLink {
                    title: unescape_title(&raw_title),
                    url: format!("{WATCH_URL}{id}"),
                })
            })
            .collect()
    }
}

/// Titles come back HTML-escaped (`&#39;`, `&quot;`, `&amp;`).
fn unescape_title(raw: &str) -> String {
    match quick_xml::escape::unescape(raw) {
        Ok(s) => s.into_owned(),
        Err(_) => raw.to_string(),
    }
}
