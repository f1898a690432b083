//! # Spam/Quality Filter
//! Per-record heuristics over the raw text: promotional phrase density,
//! symbol/emoji density, shouting, and digit walls, plus length bounds.
//! All predicates are deterministic and total; no cross-record state.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SpamSection;

/// Chars outside word/space/`.,` — an approximation of emoji and symbol
/// density in comment text.
static RE_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s,.]").expect("symbol regex"));

#[derive(Debug, Clone)]
pub struct SpamFilter {
    phrases: Vec<String>,
    min_phrase_hits: usize,
    symbol_ratio: f64,
    uppercase_ratio: f64,
    digit_ratio: f64,
    min_length: usize,
    max_length: usize,
}

impl SpamFilter {
    pub fn new(section: &SpamSection) -> Self {
        Self {
            phrases: section
                .phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            min_phrase_hits: section.min_phrase_hits,
            symbol_ratio: section.symbol_ratio,
            uppercase_ratio: section.uppercase_ratio,
            digit_ratio: section.digit_ratio,
            min_length: section.min_length,
            max_length: section.max_length,
        }
    }

    /// Any single heuristic firing marks the text as spam. The empty string
    /// trips none of them and is left for the length filter to reject.
    pub fn is_spam(&self, text: &str) -> bool {
        let total = text.chars().count();
        if total == 0 {
            return false;
        }

        let lower = text.to_lowercase();
        let phrase_hits = self
            .phrases
            .iter()
            .filter(|p| lower.contains(p.as_str()))
            .count();
        if phrase_hits >= self.min_phrase_hits {
            return true;
        }

        let symbols = RE_SYMBOL.find_iter(text).count();
        if symbols as f64 > total as f64 * self.symbol_ratio {
            return true;
        }

        let uppercase = text.chars().filter(|c| c.is_ascii_uppercase()).count();
        if uppercase as f64 > total as f64 * self.uppercase_ratio {
            return true;
        }

        let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
        if digits as f64 > total as f64 * self.digit_ratio {
            return true;
        }

        false
    }

    /// `min_length ≤ trimmed chars ≤ max_length`.
    pub fn is_valid_length(&self, text: &str) -> bool {
        let len = text.trim().chars().count();
        self.min_length <= len && len <= self.max_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> SpamFilter {
        SpamFilter::new(&SpamSection::default())
    }

    #[test]
    fn two_promo_phrases_are_spam() {
        let f = filter();
        assert!(f.is_spam("SUBSCRIBE!!! LINK IN BIO!!! FOLLOW ME!!!"));
        assert!(f.is_spam("jangan lupa like dan share ya"));
    }

    #[test]
    fn single_phrase_is_not_spam() {
        let f = filter();
        assert!(!f.is_spam("saya subscribe pendapat ini, naturalisasi bagus"));
    }

    #[test]
    fn symbol_wall_is_spam() {
        let f = filter();
        assert!(f.is_spam("!!!???***!!!???*** mantap"));
        assert!(!f.is_spam("mantap, timnas makin kuat."));
    }

    #[test]
    fn shouting_is_spam() {
        let f = filter();
        assert!(f.is_spam("GOLGOLGOLGOLGOL"));
        // Mixed case stays under the 70% uppercase bound.
        assert!(!f.is_spam("Prestasi Timnas NAIK"));
    }

    #[test]
    fn digit_wall_is_spam() {
        let f = filter();
        assert!(f.is_spam("0812345678901234567890 wa"));
        assert!(!f.is_spam("menang 3 kali berturut-turut musim ini"));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let f = SpamFilter::new(&SpamSection {
            min_length: 5,
            max_length: 10,
            ..SpamSection::default()
        });
        assert!(!f.is_valid_length("abcd"));
        assert!(f.is_valid_length("abcde"));
        assert!(f.is_valid_length("abcdefghij"));
        assert!(!f.is_valid_length("abcdefghijk"));
        // whitespace does not count toward length
        assert!(!f.is_valid_length("   ab   "));
    }

    #[test]
    fn empty_text_is_not_spam_but_fails_length() {
        let f = filter();
        assert!(!f.is_spam(""));
        assert!(!f.is_valid_length(""));
        assert!(!f.is_valid_length("        "));
    }
}
