//! # Deduplicator
//! Exact-key duplicate removal, first occurrence wins.
//!
//! Keys are precomputed per record (`RawRecord::identity_key`). Matching is
//! exact string equality only; near-duplicate detection (fuzzy similarity)
//! is a known limitation of the reference behavior, deliberately not
//! implemented here.

use std::collections::HashSet;

use crate::record::RawRecord;

/// Removes records whose identity key has been seen before, preserving the
/// relative order of survivors. Because the first occurrence wins, callers
/// must supply records in their intended priority order (freshest first).
///
/// Returns the survivors and the number of records dropped.
pub fn dedupe(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for rec in records {
        if seen.insert(rec.identity_key()) {
            kept.push(rec);
        } else {
            dropped += 1;
        }
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw(url: &str, title: &str, text: &str) -> RawRecord {
        RawRecord {
            source: "Detik".into(),
            title: Some(title.into()),
            text: text.into(),
            published_at: None,
            url: Some(url.into()),
            id: None,
            extras: HashMap::new(),
        }
    }

    #[test]
    fn first_occurrence_wins_regardless_of_content() {
        let a = raw("https://x/1", "Judul sama", "versi pertama");
        let b = raw("https://x/1", "Judul sama", "versi kedua, isi beda");
        let (kept, dropped) = dedupe(vec![a.clone(), b]);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 1);
        assert_eq!(kept[0].text, "versi pertama");
        assert_eq!(kept[0], a);
    }

    #[test]
    fn distinct_keys_all_survive_in_order() {
        let recs = vec![
            raw("https://x/1", "a", "1"),
            raw("https://x/2", "b", "2"),
            raw("https://x/3", "c", "3"),
        ];
        let (kept, dropped) = dedupe(recs.clone());
        assert_eq!(dropped, 0);
        assert_eq!(kept, recs);
    }

    #[test]
    fn same_url_different_title_is_not_a_duplicate() {
        let a = raw("https://x/1", "Judul pertama", "t");
        let b = raw("https://x/1", "Judul kedua", "t");
        let (kept, dropped) = dedupe(vec![a, b]);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn empty_input_is_a_valid_state() {
        let (kept, dropped) = dedupe(Vec::new());
        assert!(kept.is_empty());
        assert_eq!(dropped, 0);
    }
}
