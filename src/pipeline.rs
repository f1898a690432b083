//! # Pipeline Orchestrator
//! Runs a raw batch through the fixed stage order: relevance, dedupe, spam,
//! length, normalize, score. Each stage reports input/kept counts; dropped
//! records are terminal and never reconsidered by a later stage.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::classifier::{ClassifierError, DynClassifier};
use crate::config::AnalyzerConfig;
use crate::dedupe::dedupe;
use crate::normalize::TextNormalizer;
use crate::quality::SpamFilter;
use crate::record::{RawRecord, Record, SourceCategory};
use crate::relevance::RelevanceFilter;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_records_in_total", "Raw records handed to the pipeline.");
        describe_counter!("pipeline_records_out_total", "Records surviving all stages.");
        describe_counter!(
            "pipeline_dropped_total",
            "Records dropped, labeled by stage."
        );
        describe_histogram!("pipeline_run_ms", "Whole-batch run time in milliseconds.");
    });
}

/// Anonymized id for log lines; raw text is never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Relevance,
    Dedupe,
    Spam,
    Length,
    Normalize,
    Score,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Relevance => "relevance",
            Stage::Dedupe => "dedupe",
            Stage::Spam => "spam",
            Stage::Length => "length",
            Stage::Normalize => "normalize",
            Stage::Score => "score",
        }
    }
}

/// Input/kept counts for one stage of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub input: usize,
    pub kept: usize,
}

impl StageReport {
    pub fn removed(&self) -> usize {
        self.input - self.kept
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub records: Vec<Record>,
    pub stages: Vec<StageReport>,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Compiled pipeline. Built once per config; `run` is borrow-only and can be
/// called concurrently from handlers.
pub struct Pipeline {
    relevance: RelevanceFilter,
    spam: SpamFilter,
    normalizer: TextNormalizer,
    classifier: DynClassifier,
}

impl Pipeline {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::with_classifier(config, crate::classifier::build_classifier(config))
    }

    pub fn with_classifier(config: &AnalyzerConfig, classifier: DynClassifier) -> Self {
        Self {
            relevance: RelevanceFilter::new(&config.relevance),
            spam: SpamFilter::new(&config.spam),
            normalizer: TextNormalizer::from_config(config),
            classifier,
        }
    }

    pub fn relevance(&self) -> &RelevanceFilter {
        &self.relevance
    }

    pub fn spam(&self) -> &SpamFilter {
        &self.spam
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &DynClassifier {
        &self.classifier
    }

    /// Runs the whole batch. Classifier failures abort the run; filter
    /// stages never fail.
    pub fn run(&self, raw: Vec<RawRecord>) -> Result<PipelineOutcome, PipelineError> {
        ensure_metrics_described();
        let started = std::time::Instant::now();
        let total_in = raw.len();
        counter!("pipeline_records_in_total").increment(total_in as u64);

        let mut stages = Vec::with_capacity(6);

        // relevance: the combined title + body is what the gate sees,
        // so an on-topic title keeps an article whose body never repeats
        // the team name.
        let input = raw.len();
        let kept: Vec<RawRecord> = raw
            .into_iter()
            .filter(|r| {
                let gate_text = match &r.title {
                    Some(title) => format!("{title} {}", r.text),
                    None => r.text.clone(),
                };
                let relevant = self.relevance.is_relevant(&gate_text);
                if !relevant {
                    debug!(target: "pipeline", id = %anon_hash(&r.text), stage = "relevance", "drop");
                }
                relevant
            })
            .collect();
        record_stage(&mut stages, Stage::Relevance, input, kept.len());

        // dedupe: first occurrence wins, so callers order freshest first
        let input = kept.len();
        let (kept, dropped) = dedupe(kept);
        debug_assert_eq!(input, kept.len() + dropped);
        record_stage(&mut stages, Stage::Dedupe, input, kept.len());

        // spam
        let input = kept.len();
        let kept: Vec<RawRecord> = kept
            .into_iter()
            .filter(|r| {
                let spam = self.spam.is_spam(&r.text);
                if spam {
                    debug!(target: "pipeline", id = %anon_hash(&r.text), stage = "spam", "drop");
                }
                !spam
            })
            .collect();
        record_stage(&mut stages, Stage::Spam, input, kept.len());

        // length
        let input = kept.len();
        let kept: Vec<RawRecord> = kept
            .into_iter()
            .filter(|r| self.spam.is_valid_length(&r.text))
            .collect();
        record_stage(&mut stages, Stage::Length, input, kept.len());

        // normalize: records whose text normalizes to nothing carry no
        // scoreable signal and are dropped here
        let input = kept.len();
        let mut normalized: Vec<(RawRecord, String)> = Vec::with_capacity(kept.len());
        for rec in kept {
            let norm = self.normalizer.normalize(&rec.text);
            if norm.is_empty() {
                debug!(target: "pipeline", id = %anon_hash(&rec.text), stage = "normalize", "drop");
                continue;
            }
            normalized.push((rec, norm));
        }
        record_stage(&mut stages, Stage::Normalize, input, normalized.len());

        // score: enrichment only, never drops
        let input = normalized.len();
        let mut records = Vec::with_capacity(normalized.len());
        for (rec, norm) in normalized {
            let verdict = self.classifier.classify(&norm)?;
            records.push(Record {
                identity_key: rec.identity_key(),
                raw_text: rec.text,
                normalized_text: norm,
                source_category: SourceCategory::from_source_name(&rec.source),
                source_name: rec.source,
                timestamp: rec.published_at,
                positive_count: verdict.positive_count,
                negative_count: verdict.negative_count,
                score: verdict.net_score,
                sentiment: verdict.sentiment,
                opinion: verdict.opinion,
                extras: rec.extras,
            });
        }
        record_stage(&mut stages, Stage::Score, input, records.len());

        counter!("pipeline_records_out_total").increment(records.len() as u64);
        histogram!("pipeline_run_ms").record(started.elapsed().as_millis() as f64);
        info!(
            target: "pipeline",
            total_in,
            total_out = records.len(),
            classifier = self.classifier.name(),
            "batch complete"
        );

        Ok(PipelineOutcome { records, stages })
    }
}

fn record_stage(stages: &mut Vec<StageReport>, stage: Stage, input: usize, kept: usize) {
    let report = StageReport { stage, input, kept };
    counter!("pipeline_dropped_total", "stage" => stage.label())
        .increment(report.removed() as u64);
    stages.push(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pipeline() -> Pipeline {
        Pipeline::from_config(&AnalyzerConfig::seed())
    }

    fn raw(source: &str, url: Option<&str>, text: &str) -> RawRecord {
        RawRecord {
            source: source.into(),
            title: None,
            text: text.into(),
            published_at: None,
            url: url.map(Into::into),
            id: None,
            extras: HashMap::new(),
        }
    }

    #[test]
    fn happy_path_scores_a_relevant_record() {
        let out = pipeline()
            .run(vec![raw(
                "Kompas",
                Some("https://x/1"),
                "Dukung penuh naturalisasi, Timnas Indonesia makin bagus dan kuat",
            )])
            .unwrap();
        assert_eq!(out.records.len(), 1);
        let rec = &out.records[0];
        assert!(rec.score > 0);
        assert_eq!(rec.sentiment, crate::record::Sentiment::Positive);
        assert_eq!(rec.source_category, SourceCategory::News);
        assert!(!rec.normalized_text.is_empty());
    }

    #[test]
    fn stages_are_reported_in_fixed_order() {
        let out = pipeline().run(Vec::new()).unwrap();
        let order: Vec<Stage> = out.stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            order,
            vec![
                Stage::Relevance,
                Stage::Dedupe,
                Stage::Spam,
                Stage::Length,
                Stage::Normalize,
                Stage::Score,
            ]
        );
        assert!(out.records.is_empty());
    }

    #[test]
    fn duplicate_spam_is_charged_to_dedupe_not_spam() {
        // Both copies pass relevance; dedupe removes the second before the
        // spam stage ever sees it.
        let spammy =
            "SUBSCRIBE!!! LINK IN BIO!!! dukung timnas indonesia terus ya follow me semua";
        let a = raw("YouTube", None, spammy);
        let b = a.clone();
        let out = pipeline().run(vec![a, b]).unwrap();

        let by_stage = |s: Stage| out.stages.iter().find(|r| r.stage == s).unwrap().removed();
        assert_eq!(by_stage(Stage::Relevance), 0);
        assert_eq!(by_stage(Stage::Dedupe), 1);
        assert_eq!(by_stage(Stage::Spam), 1);
        assert!(out.records.is_empty());
    }

    #[test]
    fn off_topic_and_short_records_drop_at_their_stages() {
        let out = pipeline()
            .run(vec![
                raw("Detik", Some("https://x/1"), "resep nasi goreng paling enak sedunia"),
                raw("Detik", Some("https://x/2"), "garuda ok"),
            ])
            .unwrap();
        let by_stage = |s: Stage| out.stages.iter().find(|r| r.stage == s).unwrap().removed();
        assert_eq!(by_stage(Stage::Relevance), 1);
        assert_eq!(by_stage(Stage::Length), 1);
        assert!(out.records.is_empty());
    }

    #[test]
    fn title_counts_toward_relevance() {
        let mut rec = raw(
            "Kompas",
            Some("https://x/1"),
            "Pelatih menilai skuad makin solid dan kuat musim ini",
        );
        rec.title = Some("Naturalisasi Timnas Indonesia berlanjut".into());
        let out = pipeline().run(vec![rec]).unwrap();
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn kept_counts_chain_between_stages() {
        let out = pipeline()
            .run(vec![raw(
                "Kompas",
                Some("https://x/1"),
                "Dukung naturalisasi timnas indonesia, prestasi makin bagus",
            )])
            .unwrap();
        for pair in out.stages.windows(2) {
            assert_eq!(pair[0].kept, pair[1].input);
        }
    }
}
