//! Google News RSS provider: one search feed per configured keyword,
//! Indonesian locale. Parsing is pure (`parse_feed`) so fixtures can be
//! tested without the network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::HashMap;

use crate::ingest::{prepare_text, SourceProvider};
use crate::record::RawRecord;

const SEARCH_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<SourceTag>,
}

/// `<source url="...">Kompas</source>`
#[derive(Debug, Deserialize)]
struct SourceTag {
    #[serde(rename = "$text")]
    name: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses one search feed. Items without any text are skipped; the article
/// body is not available over RSS, so the scored content is the title plus
/// the snippet Google ships in `description`.
pub fn parse_feed(xml: &str, keyword: &str) -> Result<Vec<RawRecord>> {
    let rss: Rss = from_str(xml).context("parsing google news rss xml")?;
    let mut out = Vec::with_capacity(rss.channel.item.len());

    for it in rss.channel.item {
        let title = prepare_text(it.title.as_deref().unwrap_or_default());
        let snippet = prepare_text(it.description.as_deref().unwrap_or_default());
        let text = match (title.is_empty(), snippet.is_empty()) {
            (true, true) => continue,
            (false, true) => title.clone(),
            (true, false) => snippet,
            (false, false) => format!("{title}. {snippet}"),
        };

        let source = it
            .source
            .and_then(|s| s.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Google News".to_string());

        let mut extras = HashMap::new();
        extras.insert("keyword".to_string(), keyword.to_string());

        out.push(RawRecord {
            source,
            title: (!title.is_empty()).then_some(title),
            text,
            published_at: it.pub_date.as_deref().and_then(parse_rfc2822),
            url: it.link,
            id: None,
            extras,
        });
    }

    Ok(out)
}

pub struct GoogleNewsRssProvider {
    client: reqwest::Client,
    keywords: Vec<String>,
}

impl GoogleNewsRssProvider {
    pub fn new(client: reqwest::Client, keywords: Vec<String>) -> Self {
        Self { client, keywords }
    }
}

#[async_trait]
impl SourceProvider for GoogleNewsRssProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let mut out = Vec::new();

        for keyword in &self.keywords {
            let xml = self
                .client
                .get(SEARCH_URL)
                .query(&[
                    ("q", keyword.as_str()),
                    ("hl", "id"),
                    ("gl", "ID"),
                    ("ceid", "ID:id"),
                ])
                .send()
                .await
                .with_context(|| format!("fetching google news feed for {keyword:?}"))?
                .error_for_status()
                .with_context(|| format!("google news feed status for {keyword:?}"))?
                .text()
                .await
                .context("reading google news feed body")?;

            out.extend(parse_feed(&xml, keyword)?);
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_records_total").increment(out.len() as u64);

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "GoogleNews"
    }
}
