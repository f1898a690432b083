//! # Ingest
//! Source providers and the collection pass that turns remote feeds into
//! `RawRecord`s ready for the pipeline.
//!
//! Collection is best-effort per provider: one failing source is logged and
//! counted, the others still deliver. The combined batch is ordered freshest
//! first so that downstream first-wins deduplication keeps the newest copy.

pub mod providers;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::record::RawRecord;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_records_total", "Records parsed from providers.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
    });
}

/// A remote content source. Implementations fetch and parse; they do not
/// filter or classify.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &'static str;
}

/// Markup/entity cleanup applied to provider text before it enters the
/// pipeline. Linguistic normalization happens later and separately.
pub fn prepare_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// One collection pass over all providers. Returns every record gathered,
/// freshest first, plus the per-provider errors encountered.
pub async fn run_once(
    providers: &[Box<dyn SourceProvider>],
) -> (Vec<RawRecord>, Vec<(String, anyhow::Error)>) {
    ensure_metrics_described();

    let mut records = Vec::new();
    let mut errors = Vec::new();

    for provider in providers {
        match provider.fetch_latest().await {
            Ok(batch) => {
                info!(target: "ingest", provider = provider.name(), count = batch.len(), "fetched");
                counter!("ingest_records_total").increment(batch.len() as u64);
                records.extend(batch);
            }
            Err(err) => {
                warn!(target: "ingest", provider = provider.name(), error = %err, "fetch failed");
                counter!("ingest_provider_errors_total").increment(1);
                errors.push((provider.name().to_string(), err));
            }
        }
    }

    // Freshest first; undated records sink to the end.
    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    (records, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    struct FixedProvider(Vec<RawRecord>);

    #[async_trait::async_trait]
    impl SourceProvider for FixedProvider {
        async fn fetch_latest(&self) -> Result<Vec<RawRecord>> {
            Ok(self.0.clone())
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl SourceProvider for FailingProvider {
        async fn fetch_latest(&self) -> Result<Vec<RawRecord>> {
            anyhow::bail!("connection refused")
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn raw(text: &str, day: Option<u32>) -> RawRecord {
        RawRecord {
            source: "Detik".into(),
            title: None,
            text: text.into(),
            published_at: day.map(|d| Utc.with_ymd_and_hms(2025, 6, d, 0, 0, 0).unwrap()),
            url: None,
            id: None,
            extras: HashMap::new(),
        }
    }

    #[test]
    fn prepare_text_strips_markup_and_entities() {
        let cleaned = prepare_text("<b>Timnas &amp; PSSI</b>\n\n  “mantap”");
        assert_eq!(cleaned, "Timnas & PSSI \"mantap\"");
    }

    #[test]
    fn inline_tags_vanish_without_stray_spaces() {
        // tags drop out entirely, so trailing punctuation stays attached
        assert_eq!(prepare_text("makin <b>kuat</b>!"), "makin kuat!");
        assert_eq!(prepare_text("<br><br>"), "");
    }

    #[tokio::test]
    async fn failing_provider_does_not_abort_the_pass() {
        let providers: Vec<Box<dyn SourceProvider>> = vec![
            Box::new(FailingProvider),
            Box::new(FixedProvider(vec![raw("a", Some(1))])),
        ];
        let (records, errors) = run_once(&providers).await;
        assert_eq!(records.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "broken");
    }

    #[tokio::test]
    async fn combined_batch_is_freshest_first() {
        let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(FixedProvider(vec![
            raw("old", Some(1)),
            raw("undated", None),
            raw("new", Some(20)),
        ]))];
        let (records, _) = run_once(&providers).await;
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "old", "undated"]);
    }
}
