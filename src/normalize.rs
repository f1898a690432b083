//! # Text Normalizer
//! Deterministic raw text → cleaned, stemmed, stopword-free token string.
//!
//! The stage order is the contract — reordering changes the output:
//! 1. lowercase, 2. strip URLs, 3. strip @mentions/#hashtags, 4. strip
//! digits, 5. replace everything outside `[a-z\s]` with a space, 6. collapse
//! whitespace, 7. remove base-language then domain stopwords, 8. stem.
//!
//! Stages 7–8 delegate to linguistic collaborators behind traits so the
//! bundled Indonesian implementations can be swapped out (or mocked) without
//! touching the pipeline. An empty result is valid and means "drop this
//! record", never an error.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AnalyzerConfig;

static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+|www\S+").expect("url regex"));
static RE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[@#]\w+").expect("mention regex"));
static RE_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit regex"));
static RE_NON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").expect("letter regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Stages 1–6. Idempotent: re-running on already-cleaned text is a no-op.
pub fn clean_text(raw: &str) -> String {
    let text = raw.to_lowercase();
    let text = RE_URL.replace_all(&text, "");
    let text = RE_MENTION.replace_all(&text, "");
    let text = RE_DIGIT.replace_all(&text, "");
    let text = RE_NON_LETTER.replace_all(&text, " ");
    RE_WS.replace_all(&text, " ").trim().to_string()
}

/// Base-language stopword removal collaborator. Black-box, deterministic,
/// synchronous.
pub trait StopwordRemover: Send + Sync {
    fn remove(&self, text: &str) -> String;
}

/// Stemming collaborator over whole (already tokenized) text.
pub trait Stemmer: Send + Sync {
    fn stem(&self, text: &str) -> String;
}

/// Common Indonesian function words. Negations (`tidak`, `tak`, `bukan`) are
/// deliberately kept: the negative lexicon scores them.
const BASE_STOPWORDS: &[&str] = &[
    "yang", "dan", "di", "ke", "dari", "ini", "itu", "dengan", "untuk", "pada", "adalah", "sebagai",
    "dalam", "juga", "akan", "atau", "oleh", "ada", "mereka", "sudah", "saya", "kamu", "kami",
    "kita", "dia", "ia", "anda", "para", "saat", "ketika", "karena", "jika", "kalau", "agar",
    "supaya", "namun", "tetapi", "tapi", "serta", "yaitu", "yakni", "bahwa", "sebuah", "seorang",
    "tersebut", "dapat", "bisa", "telah", "masih", "hanya", "lebih", "sangat", "banget", "sekali",
    "begitu", "seperti", "antara", "setelah", "sebelum", "hingga", "sampai", "sejak", "secara",
    "terhadap", "tentang", "lagi", "pun", "lah", "kah", "nya", "ya", "sih", "dong", "deh", "kok",
    "nih", "tuh", "aja", "saja", "juga", "kan", "gak", "nggak", "udah", "udh", "yg", "dgn", "utk",
    "pd", "dls", "dll", "dsb", "mau", "harus", "per", "bagi", "buat", "kepada", "sama", "semua",
    "setiap", "beberapa", "suatu", "hal", "cara", "orang",
];

/// Stopword remover backed by the built-in Indonesian list.
#[derive(Debug, Clone)]
pub struct IndonesianStopwords {
    words: HashSet<String>,
}

impl IndonesianStopwords {
    pub fn new() -> Self {
        Self {
            words: BASE_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Default for IndonesianStopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordRemover for IndonesianStopwords {
    fn remove(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|w| !self.words.contains(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Roots the stemmer should recognize beyond the lexicon entries.
const EXTRA_ROOTS: &[&str] = &[
    "tingkat", "turun", "naik", "main", "latih", "tanding", "bela", "pilih", "wakil", "warga",
    "negara", "bangsa", "tim", "laga", "gol", "skor", "kualitas", "fisik", "teknik", "umur", "usia",
    "lahir", "darah", "nenek", "moyang", "paspor", "sumpah", "janji", "proses", "cepat", "lambat",
    "adil", "resmi", "sah", "karier", "klub", "liga", "musim",
];

/// Dictionary-guided Indonesian affix stripper, an approximation of the
/// Nazief–Adriani scheme: strip particle → possessive → derivational
/// suffixes, then up to three prefixes (with sound-restoration candidates
/// for the nasal prefixes), accepting the first known root. Words that never
/// reach a known root are returned unchanged.
#[derive(Debug, Clone)]
pub struct AffixStemmer {
    roots: HashSet<String>,
}

impl AffixStemmer {
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: HashSet<String> = roots
            .into_iter()
            .map(|r| r.as_ref().to_lowercase())
            // multi-word lexicon entries are not token roots
            .filter(|r| !r.contains(' '))
            .collect();
        set.extend(EXTRA_ROOTS.iter().map(|r| r.to_string()));
        Self { roots: set }
    }

    /// Root dictionary seeded from both lexicons plus the built-in extras.
    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(
            cfg.lexicon
                .positive_words
                .iter()
                .chain(cfg.lexicon.negative_words.iter()),
        )
    }

    fn stem_word(&self, word: &str) -> String {
        if word.chars().count() <= 3 || self.roots.contains(word) {
            return word.to_string();
        }

        // Suffix order: particle, possessive, derivational. Each strip is
        // cumulative; every intermediate form is a candidate.
        let mut variants = vec![word.to_string()];
        let mut current = word.to_string();
        for group in [PARTICLE_SUFFIXES, POSSESSIVE_SUFFIXES, DERIVATIONAL_SUFFIXES] {
            if let Some(stripped) = strip_suffix_group(&current, group) {
                current = stripped;
                variants.push(current.clone());
            }
        }

        for v in &variants {
            if self.roots.contains(v.as_str()) {
                return v.clone();
            }
        }

        // Prefix stripping: breadth-first, at most three layers deep.
        let mut frontier: Vec<String> = variants;
        let mut seen: HashSet<String> = frontier.iter().cloned().collect();
        for _ in 0..3 {
            let mut next = Vec::new();
            for v in &frontier {
                for cand in prefix_candidates(v) {
                    if self.roots.contains(cand.as_str()) {
                        return cand;
                    }
                    if seen.insert(cand.clone()) {
                        next.push(cand);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        word.to_string()
    }
}

impl Stemmer for AffixStemmer {
    fn stem(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|w| self.stem_word(w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const PARTICLE_SUFFIXES: &[&str] = &["lah", "kah", "tah", "pun"];
const POSSESSIVE_SUFFIXES: &[&str] = &["ku", "mu", "nya"];
const DERIVATIONAL_SUFFIXES: &[&str] = &["kan", "an", "i"];

fn strip_suffix_group(word: &str, suffixes: &[&str]) -> Option<String> {
    for suf in suffixes {
        if let Some(stem) = word.strip_suffix(suf) {
            if stem.chars().count() >= 3 {
                return Some(stem.to_string());
            }
        }
    }
    None
}

/// One-layer prefix strips. Nasal prefixes (`mem`, `men`, `meng`, `meny` and
/// their `pe-` counterparts) assimilate the root's initial consonant, so a
/// restored form is emitted alongside the bare strip.
fn prefix_candidates(word: &str) -> Vec<String> {
    // longest-first so "meng-" is tried before "me-"
    const RULES: &[(&str, &[&str])] = &[
        ("meny", &["s"]),
        ("meng", &["k", "g", ""]),
        ("mem", &["p", ""]),
        ("men", &["t", ""]),
        ("me", &[""]),
        ("peny", &["s"]),
        ("peng", &["k", ""]),
        ("pem", &["p", ""]),
        ("pen", &["t", ""]),
        ("pe", &[""]),
        ("ber", &[""]),
        ("be", &[""]),
        ("ter", &[""]),
        ("te", &[""]),
        ("di", &[""]),
        ("ke", &[""]),
        ("se", &[""]),
    ];

    let mut out = Vec::new();
    for (prefix, restores) in RULES {
        if let Some(rest) = word.strip_prefix(prefix) {
            for restore in restores.iter() {
                let cand = format!("{restore}{rest}");
                if cand.chars().count() >= 3 {
                    out.push(cand);
                }
            }
            // only the longest matching rule applies per layer
            break;
        }
    }
    out
}

/// Full normalizer: stages 1–6 locally, 7–8 via collaborators.
pub struct TextNormalizer {
    stopwords: Box<dyn StopwordRemover>,
    stemmer: Box<dyn Stemmer>,
    domain_stopwords: HashSet<String>,
}

impl TextNormalizer {
    /// Bundled Indonesian collaborators, domain stopwords from config.
    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::with_collaborators(
            Box::new(IndonesianStopwords::new()),
            Box::new(AffixStemmer::from_config(cfg)),
            &cfg.stopwords.domain,
        )
    }

    pub fn with_collaborators(
        stopwords: Box<dyn StopwordRemover>,
        stemmer: Box<dyn Stemmer>,
        domain_stopwords: &[String],
    ) -> Self {
        Self {
            stopwords,
            stemmer,
            domain_stopwords: domain_stopwords.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn normalize(&self, raw_text: &str) -> String {
        let cleaned = clean_text(raw_text);
        if cleaned.is_empty() {
            return String::new();
        }

        let without_base = self.stopwords.remove(&cleaned);
        let without_domain = without_base
            .split_whitespace()
            .filter(|w| !self.domain_stopwords.contains(*w))
            .collect::<Vec<_>>()
            .join(" ");

        self.stemmer.stem(&without_domain).trim().to_string()
    }
}
