//! # HTTP API
//! Axum surface over the pipeline: single-text analysis, batch runs, and the
//! summary/comparison views of the most recent batch.

use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregate::{Comparison, Summary};
use crate::config::AnalyzerConfig;
use crate::pipeline::{Pipeline, StageReport};
use crate::record::{RawRecord, Record};

/// Result of the most recent `/batch` run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchSnapshot {
    pub records: Vec<Record>,
    pub stages: Vec<StageReport>,
    pub summary: Summary,
}

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    comparison_threshold_pct: f64,
    snapshot: Arc<RwLock<Option<BatchSnapshot>>>,
}

impl AppState {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            pipeline: Arc::new(Pipeline::from_config(config)),
            comparison_threshold_pct: config.comparison.balance_threshold_pct,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Runs a batch and retains the outcome for `/summary` and `/comparison`.
    pub fn run_batch(&self, raw: Vec<RawRecord>) -> Result<BatchSnapshot, String> {
        let outcome = self.pipeline.run(raw).map_err(|e| e.to_string())?;
        let snapshot = BatchSnapshot {
            summary: Summary::from_records(&outcome.records),
            records: outcome.records,
            stages: outcome.stages,
        };
        *self.snapshot.write().expect("rwlock poisoned") = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn latest(&self) -> Option<BatchSnapshot> {
        self.snapshot.read().expect("rwlock poisoned").clone()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/batch", post(run_batch))
        .route("/summary", get(summary))
        .route("/comparison", get(comparison))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct AnalyzeReq {
    text: String,
}

#[derive(serde::Serialize)]
struct AnalyzeResp {
    relevant: bool,
    spam: bool,
    valid_length: bool,
    normalized_text: String,
    positive_count: u32,
    negative_count: u32,
    score: i32,
    sentiment: crate::record::Sentiment,
    opinion: crate::record::Opinion,
    confidence: f64,
}

/// Single-text diagnostic: every verdict is reported, nothing is dropped.
async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Result<Json<AnalyzeResp>, (StatusCode, String)> {
    let pipeline = state.pipeline();
    let normalized = pipeline.normalizer().normalize(&body.text);
    let verdict = pipeline
        .classifier()
        .classify(&normalized)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(AnalyzeResp {
        relevant: pipeline.relevance().is_relevant(&body.text),
        spam: pipeline.spam().is_spam(&body.text),
        valid_length: pipeline.spam().is_valid_length(&body.text),
        normalized_text: normalized,
        positive_count: verdict.positive_count,
        negative_count: verdict.negative_count,
        score: verdict.net_score,
        sentiment: verdict.sentiment,
        opinion: verdict.opinion,
        confidence: verdict.confidence,
    }))
}

async fn run_batch(
    State(state): State<AppState>,
    Json(raw): Json<Vec<RawRecord>>,
) -> Result<Json<BatchSnapshot>, (StatusCode, String)> {
    state
        .run_batch(raw)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e))
}

async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, StatusCode> {
    state
        .latest()
        .map(|s| Json(s.summary))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn comparison(State(state): State<AppState>) -> Result<Json<Comparison>, StatusCode> {
    state
        .latest()
        .map(|s| Json(s.summary.comparison(state.comparison_threshold_pct)))
        .ok_or(StatusCode::NOT_FOUND)
}
