// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod classifier;
pub mod config;
pub mod dedupe;
pub mod export;
pub mod ingest;
pub mod lexicon;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod quality;
pub mod record;
pub mod relevance;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{AggregateStat, Balance, Comparison, Summary};
pub use crate::api::{create_router, AppState};
pub use crate::config::AnalyzerConfig;
pub use crate::pipeline::{Pipeline, PipelineOutcome, Stage, StageReport};
pub use crate::record::{Opinion, RawRecord, Record, Sentiment, SourceCategory};
