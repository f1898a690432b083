//! # Relevance Filter
//! Allow/deny substring gate deciding whether a text is about the Indonesian
//! squad at all. Deny terms have absolute priority over allow terms.

use crate::config::RelevanceSection;

/// Compiled topical gate. Term lists are lowercased once at construction;
/// matching is plain case-insensitive substring, no token boundaries.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl RelevanceFilter {
    pub fn new(section: &RelevanceSection) -> Self {
        Self {
            allow: lower_all(&section.allow_terms),
            deny: lower_all(&section.deny_terms),
        }
    }

    /// Total function: any deny term present → false immediately; otherwise
    /// true iff at least one allow term occurs. The empty string matches no
    /// allow term and is therefore not relevant.
    pub fn is_relevant(&self, raw_text: &str) -> bool {
        let text = raw_text.to_lowercase();

        for term in &self.deny {
            if text.contains(term.as_str()) {
                return false;
            }
        }

        self.allow.iter().any(|term| text.contains(term.as_str()))
    }
}

fn lower_all(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RelevanceFilter {
        RelevanceFilter::new(&RelevanceSection {
            allow_terms: vec!["indonesia".into(), "garuda".into()],
            deny_terms: vec!["timnas malaysia".into()],
        })
    }

    #[test]
    fn allow_term_makes_relevant() {
        let f = filter();
        assert!(f.is_relevant("Naturalisasi pemain Timnas Indonesia menuai pro kontra"));
        assert!(f.is_relevant("SKUAD GARUDA makin kuat"));
    }

    #[test]
    fn deny_term_wins_over_allow_term() {
        let f = filter();
        // Mentions Indonesia, but is about the Malaysian squad.
        assert!(!f.is_relevant("Timnas Malaysia kalahkan Indonesia di kualifikasi"));
    }

    #[test]
    fn empty_and_offtopic_are_not_relevant() {
        let f = filter();
        assert!(!f.is_relevant(""));
        assert!(!f.is_relevant("resep nasi goreng enak"));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let f = filter();
        assert!(f.is_relevant("dukung GARUDA!"));
    }
}
