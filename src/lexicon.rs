//! # Lexicon Scorer
//! Additive sentiment scoring over normalized text: count tokens present in
//! the positive and negative word sets, net score is the difference.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::LexiconSection;
use crate::record::{Opinion, Sentiment};

/// Polarity tallies for one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentimentScore {
    pub positive_count: u32,
    pub negative_count: u32,
    /// `positive_count - negative_count`.
    pub net_score: i32,
}

impl SentimentScore {
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from_net_score(self.net_score)
    }

    pub fn opinion(&self) -> Opinion {
        Opinion::from(self.sentiment())
    }
}

/// Positive/negative word sets. The sets are not required to be disjoint; a
/// token present in both counts toward both tallies (ambiguity-tolerant
/// scoring, intentionally not deduplicated).
#[derive(Debug, Clone)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Lexicon {
    pub fn new(section: &LexiconSection) -> Self {
        Self {
            positive: lower_set(&section.positive_words),
            negative: lower_set(&section.negative_words),
        }
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }

    /// Splits on whitespace only — normalization already stripped
    /// punctuation. Membership is case-insensitive exact token match, never
    /// substring. Empty input scores (0, 0, 0).
    pub fn score(&self, normalized_text: &str) -> SentimentScore {
        let mut positive = 0u32;
        let mut negative = 0u32;

        for token in normalized_text.split_whitespace() {
            let token = token.to_lowercase();
            if self.positive.contains(&token) {
                positive += 1;
            }
            if self.negative.contains(&token) {
                negative += 1;
            }
        }

        SentimentScore {
            positive_count: positive,
            negative_count: negative,
            net_score: positive as i32 - negative as i32,
        }
    }
}

fn lower_set(words: &[String]) -> HashSet<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}
