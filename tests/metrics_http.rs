// tests/metrics_http.rs
//
// The Prometheus exposition must contain series recorded through the app's
// metrics facade. A recorder/facade version split would render an empty
// body, so this asserts on actual content, not just status.
//
// The recorder is global per process; everything lives in one test so the
// install happens exactly once in this binary.

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use std::collections::HashMap;
use tower::ServiceExt as _;

use timnas_sentiment_analyzer::api::{create_router, AppState};
use timnas_sentiment_analyzer::config::AnalyzerConfig;
use timnas_sentiment_analyzer::metrics::Metrics;
use timnas_sentiment_analyzer::record::RawRecord;

#[tokio::test]
async fn metrics_endpoint_contains_recorded_series() {
    let config = AnalyzerConfig::seed();
    let metrics = Metrics::init(&config);
    let state = AppState::new(&config);
    let app = create_router(state.clone()).merge(metrics.router());

    // run a batch so the pipeline counters have recorded values
    state
        .run_batch(vec![RawRecord {
            source: "Kompas".into(),
            title: None,
            text: "dukung naturalisasi timnas indonesia, prestasi makin bagus".into(),
            published_at: None,
            url: Some("https://news.example.test/1".into()),
            id: None,
            extras: HashMap::new(),
        }])
        .expect("batch");

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.trim().is_empty(), "exposition should not be empty");

    for needle in [
        "lexicon_positive_words",
        "lexicon_negative_words",
        "pipeline_records_in_total",
        "pipeline_records_out_total",
        "pipeline_dropped_total",
    ] {
        assert!(text.contains(needle), "missing series: {needle}\n{text}");
    }
}
