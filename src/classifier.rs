//! Classifier abstraction: the scoring collaborator behind a trait so the
//! pipeline and HTTP handlers never depend on a concrete implementation.
//! The default implementation wraps the lexicon scorer; a deterministic mock
//! is available for tests via `CLASSIFIER_TEST_MODE=mock`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::AnalyzerConfig;
use crate::lexicon::Lexicon;
use crate::record::{Opinion, Sentiment};

/// Verdict for one normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub positive_count: u32,
    pub negative_count: u32,
    pub net_score: i32,
    pub sentiment: Sentiment,
    pub opinion: Opinion,
    /// Share of matched tokens backing the majority polarity, 0.0 when
    /// nothing matched.
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait object used by the pipeline and handlers.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, normalized_text: &str) -> Result<Classification, ClassifierError>;
    /// Implementation name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynClassifier = Arc<dyn SentimentClassifier>;

/// Default backend: additive lexicon scoring.
pub struct LexiconClassifier {
    lexicon: Lexicon,
}

impl LexiconClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(Lexicon::new(&config.lexicon))
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, normalized_text: &str) -> Result<Classification, ClassifierError> {
        let score = self.lexicon.score(normalized_text);
        let matched = score.positive_count + score.negative_count;
        let confidence = if matched == 0 {
            0.0
        } else {
            f64::from(score.net_score.unsigned_abs()) / f64::from(matched)
        };
        Ok(Classification {
            positive_count: score.positive_count,
            negative_count: score.negative_count,
            net_score: score.net_score,
            sentiment: score.sentiment(),
            opinion: score.opinion(),
            confidence,
        })
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Deterministic mock: every text is neutral. Only for tests and local runs.
pub struct MockClassifier;

impl SentimentClassifier for MockClassifier {
    fn classify(&self, _normalized_text: &str) -> Result<Classification, ClassifierError> {
        Ok(Classification {
            positive_count: 0,
            negative_count: 0,
            net_score: 0,
            sentiment: Sentiment::Neutral,
            opinion: Opinion::Neutral,
            confidence: 0.0,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Factory: `CLASSIFIER_TEST_MODE=mock` forces the mock, otherwise the
/// lexicon backend built from config.
pub fn build_classifier(config: &AnalyzerConfig) -> DynClassifier {
    if std::env::var("CLASSIFIER_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockClassifier);
    }
    Arc::new(LexiconClassifier::from_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_backend_matches_scorer_output() {
        let clf = LexiconClassifier::from_config(&AnalyzerConfig::seed());
        let verdict = clf.classify("dukung bagus gagal").unwrap();
        assert_eq!(verdict.positive_count, 2);
        assert_eq!(verdict.negative_count, 1);
        assert_eq!(verdict.net_score, 1);
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.opinion, Opinion::Agree);
        // net score of 1 over 3 matched tokens
        assert!((verdict.confidence - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_zero_without_matches_and_one_when_unanimous() {
        let clf = LexiconClassifier::from_config(&AnalyzerConfig::seed());
        assert_eq!(clf.classify("").unwrap().confidence, 0.0);
        assert_eq!(clf.classify("zzz qqq").unwrap().confidence, 0.0);
        assert!((clf.classify("dukung bagus").unwrap().confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mock_is_always_neutral() {
        let verdict = MockClassifier.classify("dukung dukung dukung").unwrap();
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.net_score, 0);
    }
}
