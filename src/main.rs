//! Binary entrypoint: boots the HTTP server and, when enabled, runs one
//! ingest-and-analyze pass at startup so `/summary` is populated immediately.
//!
//! Environment:
//!   PORT                 listen port (default 8080)
//!   ANALYZER_CONFIG_PATH analyzer config TOML (default config/analyzer.toml)
//!   INGEST_ON_START      "1" to crawl + analyze once at boot
//!   NEWS_KEYWORDS        comma-separated Google News search keywords
//!   YOUTUBE_API_KEY      enables the comment provider when set
//!   YOUTUBE_VIDEO_IDS    comma-separated video ids for comment ingestion
//!   ANALYZER_EXPORT_DIR  where batch exports land (default out/)

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use timnas_sentiment_analyzer::aggregate::Summary;
use timnas_sentiment_analyzer::api::{create_router, AppState};
use timnas_sentiment_analyzer::config::AnalyzerConfig;
use timnas_sentiment_analyzer::export::Exporter;
use timnas_sentiment_analyzer::ingest::providers::{GoogleNewsRssProvider, YouTubeCommentsProvider};
use timnas_sentiment_analyzer::ingest::{run_once, SourceProvider};
use timnas_sentiment_analyzer::metrics::Metrics;

const DEFAULT_KEYWORDS: &[&str] = &[
    "naturalisasi timnas indonesia",
    "pemain naturalisasi indonesia",
    "naturalisasi pssi",
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn csv_env(name: &str) -> Option<Vec<String>> {
    let raw = std::env::var(name).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

fn build_providers() -> Vec<Box<dyn SourceProvider>> {
    let client = reqwest::Client::new();
    let mut providers: Vec<Box<dyn SourceProvider>> = Vec::new();

    let keywords = csv_env("NEWS_KEYWORDS")
        .unwrap_or_else(|| DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect());
    providers.push(Box::new(GoogleNewsRssProvider::new(
        client.clone(),
        keywords,
    )));

    let video_ids = csv_env("YOUTUBE_VIDEO_IDS").unwrap_or_default();
    if video_ids.is_empty() {
        info!("no YOUTUBE_VIDEO_IDS configured, skipping comment ingestion");
    } else {
        match YouTubeCommentsProvider::from_env(client, video_ids) {
            Some(p) => providers.push(Box::new(p)),
            None => warn!("YOUTUBE_VIDEO_IDS set but YOUTUBE_API_KEY missing, skipping comments"),
        }
    }

    providers
}

async fn ingest_and_analyze(state: &AppState) {
    let providers = build_providers();
    let (raw, errors) = run_once(&providers).await;
    for (provider, err) in &errors {
        warn!(provider, error = %err, "provider failed during startup ingest");
    }
    info!(count = raw.len(), "startup ingest collected records");

    match state.run_batch(raw) {
        Ok(snapshot) => {
            info!(
                kept = snapshot.records.len(),
                agree_pct = snapshot.summary.overall.agree_pct,
                "startup batch analyzed"
            );
            export_snapshot(&snapshot.records, &snapshot.summary);
        }
        Err(err) => error!(error = %err, "startup batch failed"),
    }
}

fn export_snapshot(records: &[timnas_sentiment_analyzer::record::Record], summary: &Summary) {
    let exporter = Exporter::from_env();
    if let Err(err) = exporter.write_records(records) {
        error!(error = %err, "records export failed");
    }
    if let Err(err) = exporter.write_summary(summary) {
        error!(error = %err, "summary export failed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AnalyzerConfig::load_default()?;
    info!(
        allow_terms = config.relevance.allow_terms.len(),
        positive_words = config.lexicon.positive_words.len(),
        negative_words = config.lexicon.negative_words.len(),
        "analyzer config loaded"
    );

    let metrics = Metrics::init(&config);
    let state = AppState::new(&config);

    if std::env::var("INGEST_ON_START").ok().as_deref() == Some("1") {
        ingest_and_analyze(&state).await;
    }

    let router = create_router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
