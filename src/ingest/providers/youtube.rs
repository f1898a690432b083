//! YouTube comment provider: top-level comments of configured videos via the
//! Data API v3 `commentThreads` endpoint. Parsing is pure
//! (`parse_comment_threads`) so fixtures can be tested without the network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::collections::HashMap;

use crate::ingest::{prepare_text, SourceProvider};
use crate::record::RawRecord;

const COMMENT_THREADS_URL: &str = "https://www.googleapis.com/youtube/v3/commentThreads";
const MAX_RESULTS: &str = "100";

pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Deserialize)]
struct ThreadsResponse {
    #[serde(default)]
    items: Vec<Thread>,
}

#[derive(Debug, Deserialize)]
struct Thread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: Comment,
}

#[derive(Debug, Deserialize)]
struct Comment {
    id: String,
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    video_id: String,
    published_at: Option<String>,
}

fn parse_rfc3339(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses one `commentThreads` page. `textDisplay` is HTML, so markup and
/// entities are stripped here; comments left empty after that are skipped.
pub fn parse_comment_threads(json: &str) -> Result<Vec<RawRecord>> {
    let resp: ThreadsResponse =
        serde_json::from_str(json).context("parsing youtube commentThreads json")?;
    let mut out = Vec::with_capacity(resp.items.len());

    for thread in resp.items {
        let comment = thread.snippet.top_level_comment;
        let text = prepare_text(&comment.snippet.text_display);
        if text.is_empty() {
            continue;
        }

        let mut extras = HashMap::new();
        if !comment.snippet.author_display_name.is_empty() {
            extras.insert("author".to_string(), comment.snippet.author_display_name);
        }
        if !comment.snippet.video_id.is_empty() {
            extras.insert("video_id".to_string(), comment.snippet.video_id.clone());
        }

        out.push(RawRecord {
            source: "YouTube".to_string(),
            title: None,
            text,
            published_at: comment
                .snippet
                .published_at
                .as_deref()
                .and_then(parse_rfc3339),
            url: None,
            id: Some(comment.id),
            extras,
        });
    }

    Ok(out)
}

pub struct YouTubeCommentsProvider {
    client: reqwest::Client,
    api_key: String,
    video_ids: Vec<String>,
}

impl YouTubeCommentsProvider {
    pub fn new(client: reqwest::Client, api_key: String, video_ids: Vec<String>) -> Self {
        Self {
            client,
            api_key,
            video_ids,
        }
    }

    /// Builds the provider from `$YOUTUBE_API_KEY`; `None` when unset, which
    /// callers treat as "comment ingestion disabled".
    pub fn from_env(client: reqwest::Client, video_ids: Vec<String>) -> Option<Self> {
        let api_key = std::env::var(ENV_YOUTUBE_API_KEY).ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self::new(client, api_key, video_ids))
    }
}

#[async_trait]
impl SourceProvider for YouTubeCommentsProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let mut out = Vec::new();

        for video_id in &self.video_ids {
            let body = self
                .client
                .get(COMMENT_THREADS_URL)
                .query(&[
                    ("part", "snippet"),
                    ("videoId", video_id.as_str()),
                    ("maxResults", MAX_RESULTS),
                    ("textFormat", "html"),
                    ("key", self.api_key.as_str()),
                ])
                .send()
                .await
                .with_context(|| format!("fetching comments for video {video_id}"))?
                .error_for_status()
                .with_context(|| format!("commentThreads status for video {video_id}"))?
                .text()
                .await
                .context("reading commentThreads body")?;

            out.extend(parse_comment_threads(&body)?);
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_records_total").increment(out.len() as u64);

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "YouTube"
    }
}
