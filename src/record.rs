//! # Record Model
//! Strongly-typed unit of content flowing through the pipeline.
//!
//! A `RawRecord` comes from a crawler collaborator; the pipeline enriches it
//! into a `Record` (normalized text, polarity counts, sentiment, opinion) or
//! discards it at a filter stage. Discard is terminal.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad source bucket used for comparison statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceCategory {
    News,
    VideoComment,
}

impl SourceCategory {
    /// Derived from the source name: the comment scraper always reports
    /// `"YouTube"`; every other source is a news outlet.
    pub fn from_source_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("youtube") {
            SourceCategory::VideoComment
        } else {
            SourceCategory::News
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceCategory::News => "News",
            SourceCategory::VideoComment => "YouTube",
        }
    }
}

/// Three-way sentiment class, a pure function of the net lexicon score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Sign rule: net > 0 → Positive, net < 0 → Negative, net = 0 → Neutral.
    pub fn from_net_score(net: i32) -> Self {
        match net {
            n if n > 0 => Sentiment::Positive,
            n if n < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// Agree/disagree label; carries no information beyond the sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opinion {
    Agree,
    Disagree,
    Neutral,
}

impl From<Sentiment> for Opinion {
    /// Fixed 1:1 mapping; no other combination is valid.
    fn from(s: Sentiment) -> Self {
        match s {
            Sentiment::Positive => Opinion::Agree,
            Sentiment::Negative => Opinion::Disagree,
            Sentiment::Neutral => Opinion::Neutral,
        }
    }
}

/// One raw unit of content as handed over by a crawling collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Outlet name or `"YouTube"`.
    pub source: String,
    /// Article title; comments have none.
    #[serde(default)]
    pub title: Option<String>,
    /// Original content. Immutable once ingested.
    pub text: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    /// Source-specific id (comment id, video id) when there is no URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Source-specific extras (search keyword, video id, author, ...).
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

impl RawRecord {
    /// Key used for exact-duplicate detection: `<url-or-id>_<text prefix>`.
    ///
    /// The prefix is the first 50 chars of the title (articles) or of the
    /// content (comments), so syndicated re-posts of the same article under
    /// slightly different URLs still need both parts to collide.
    pub fn identity_key(&self) -> String {
        let anchor = self
            .url
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default();
        let prefix: String = self
            .title
            .as_deref()
            .unwrap_or(&self.text)
            .chars()
            .take(50)
            .collect();
        format!("{anchor}_{prefix}")
    }
}

/// Fully enriched record retained in the final output set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub identity_key: String,
    pub raw_text: String,
    /// Always derived from `raw_text` by the normalizer; never hand-edited.
    pub normalized_text: String,
    pub source_name: String,
    pub source_category: SourceCategory,
    pub timestamp: Option<DateTime<Utc>>,
    pub positive_count: u32,
    pub negative_count: u32,
    /// `positive_count - negative_count`.
    pub score: i32,
    pub sentiment: Sentiment,
    pub opinion: Opinion,
    #[serde(default)]
    pub extras: HashMap<String, String>,
}
