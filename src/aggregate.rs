//! # Aggregation & Comparison
//! Descriptive statistics over classified records: class counts and
//! percentages per partition, plus a two-partition comparison diagnostic.
//! Pure functions over slices; no interior state.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::record::{Opinion, Record, Sentiment};

/// Counts and percentages for one partition. Percentages of an empty
/// partition are all 0.0 (guarded division, never NaN).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStat {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub agree: usize,
    pub disagree: usize,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
    pub agree_pct: f64,
    pub disagree_pct: f64,
    pub avg_score: f64,
}

impl AggregateStat {
    pub fn empty() -> Self {
        Self {
            total: 0,
            positive: 0,
            negative: 0,
            neutral: 0,
            agree: 0,
            disagree: 0,
            positive_pct: 0.0,
            negative_pct: 0.0,
            neutral_pct: 0.0,
            agree_pct: 0.0,
            disagree_pct: 0.0,
            avg_score: 0.0,
        }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut stat = Self::empty();
        let mut score_sum = 0i64;

        for rec in records {
            stat.total += 1;
            score_sum += i64::from(rec.score);
            match rec.sentiment {
                Sentiment::Positive => stat.positive += 1,
                Sentiment::Negative => stat.negative += 1,
                Sentiment::Neutral => stat.neutral += 1,
            }
            match rec.opinion {
                Opinion::Agree => stat.agree += 1,
                Opinion::Disagree => stat.disagree += 1,
                Opinion::Neutral => {}
            }
        }

        if stat.total > 0 {
            let total = stat.total as f64;
            stat.positive_pct = stat.positive as f64 / total * 100.0;
            stat.negative_pct = stat.negative as f64 / total * 100.0;
            stat.neutral_pct = stat.neutral as f64 / total * 100.0;
            stat.agree_pct = stat.agree as f64 / total * 100.0;
            stat.disagree_pct = stat.disagree as f64 / total * 100.0;
            stat.avg_score = score_sum as f64 / total;
        }

        stat
    }
}

/// Breakdown keyed by an arbitrary partition function (source name, source
/// category, ...). The everything-combined bucket is not one of the groups;
/// compute it with `AggregateStat::from_records` over the full slice, the
/// way `Summary::from_records` pairs its `overall` with the source buckets.
pub fn aggregate_by<K, F>(records: &[Record], key_fn: F) -> HashMap<K, AggregateStat>
where
    K: Eq + Hash,
    F: Fn(&Record) -> K,
{
    let mut groups: HashMap<K, Vec<&Record>> = HashMap::new();
    for rec in records {
        groups.entry(key_fn(rec)).or_default().push(rec);
    }
    groups
        .into_iter()
        .map(|(k, v)| (k, AggregateStat::from_records(v.into_iter())))
        .collect()
}

/// The standard report shape: everything combined plus the two source
/// buckets, mirroring the news-vs-comments study design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub overall: AggregateStat,
    pub news: AggregateStat,
    pub youtube: AggregateStat,
}

impl Summary {
    pub fn from_records(records: &[Record]) -> Self {
        let news = records
            .iter()
            .filter(|r| r.source_category == crate::record::SourceCategory::News);
        let youtube = records
            .iter()
            .filter(|r| r.source_category == crate::record::SourceCategory::VideoComment);
        Self {
            overall: AggregateStat::from_records(records),
            news: AggregateStat::from_records(news),
            youtube: AggregateStat::from_records(youtube),
        }
    }

    /// News-vs-YouTube diagnostic at the given balance threshold.
    pub fn comparison(&self, balance_threshold_pct: f64) -> Comparison {
        compare(
            "News",
            self.news.clone(),
            "YouTube",
            self.youtube.clone(),
            balance_threshold_pct,
        )
    }
}

/// Which side a comparison leans toward, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Balance {
    /// AGREE-percentage gap below the configured threshold.
    Balanced,
    Leans { toward: String, margin_pct: f64 },
}

/// Two-partition diagnostic (e.g. News vs YouTube).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub label_a: String,
    pub label_b: String,
    pub stat_a: AggregateStat,
    pub stat_b: AggregateStat,
    /// `agree_pct(a) - agree_pct(b)`, in points.
    pub agree_gap_pct: f64,
    /// `disagree_pct(a) - disagree_pct(b)`, in points.
    pub disagree_gap_pct: f64,
    pub balance: Balance,
}

/// Compares two partitions on their AGREE percentage. The gap keeps its
/// sign (positive means `a` agrees more); the lean is declared only when
/// the absolute gap reaches `balance_threshold_pct`.
pub fn compare(
    label_a: &str,
    stat_a: AggregateStat,
    label_b: &str,
    stat_b: AggregateStat,
    balance_threshold_pct: f64,
) -> Comparison {
    let agree_gap_pct = stat_a.agree_pct - stat_b.agree_pct;
    let disagree_gap_pct = stat_a.disagree_pct - stat_b.disagree_pct;

    let balance = if agree_gap_pct.abs() < balance_threshold_pct {
        Balance::Balanced
    } else if agree_gap_pct > 0.0 {
        Balance::Leans {
            toward: label_a.to_string(),
            margin_pct: agree_gap_pct,
        }
    } else {
        Balance::Leans {
            toward: label_b.to_string(),
            margin_pct: -agree_gap_pct,
        }
    };

    Comparison {
        label_a: label_a.to_string(),
        label_b: label_b.to_string(),
        stat_a,
        stat_b,
        agree_gap_pct,
        disagree_gap_pct,
        balance,
    }
}
