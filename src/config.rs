//! # Analyzer Configuration
//!
//! One immutable value object holding everything that is externally
//! swappable: relevance allow/deny term lists, the sentiment lexicons, the
//! domain stopword set, spam heuristics, length bounds, and the comparison
//! balance threshold. Loaded once per run and passed into component
//! constructors; components never reach for global state.
//!
//! Resolution order mirrors the rest of the config surface:
//! 1. `$ANALYZER_CONFIG_PATH`
//! 2. `config/analyzer.toml`
//! 3. built-in seed (the original Indonesian lexicons)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub relevance: RelevanceSection,
    #[serde(default)]
    pub lexicon: LexiconSection,
    #[serde(default)]
    pub stopwords: StopwordSection,
    #[serde(default)]
    pub spam: SpamSection,
    #[serde(default)]
    pub comparison: ComparisonSection,
}

/// Topical gate: at least one allow term, no deny term.
#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceSection {
    #[serde(default = "seed_allow_terms")]
    pub allow_terms: Vec<String>,
    #[serde(default = "seed_deny_terms")]
    pub deny_terms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSection {
    #[serde(default = "seed_positive_words")]
    pub positive_words: Vec<String>,
    #[serde(default = "seed_negative_words")]
    pub negative_words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopwordSection {
    /// Domain-specific stopwords removed after the base-language pass.
    #[serde(default = "seed_domain_stopwords")]
    pub domain: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpamSection {
    #[serde(default = "seed_spam_phrases")]
    pub phrases: Vec<String>,
    /// Spam if at least this many configured phrases occur.
    #[serde(default = "default_min_phrase_hits")]
    pub min_phrase_hits: usize,
    /// Spam if the fraction of non-word, non-space, non-`.,` chars exceeds this.
    #[serde(default = "default_symbol_ratio")]
    pub symbol_ratio: f64,
    /// Spam if the fraction of uppercase letters exceeds this.
    #[serde(default = "default_uppercase_ratio")]
    pub uppercase_ratio: f64,
    /// Spam if the fraction of digits exceeds this.
    #[serde(default = "default_digit_ratio")]
    pub digit_ratio: f64,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonSection {
    /// AGREE-percentage gap (in points) under which two partitions count as balanced.
    #[serde(default = "default_balance_threshold")]
    pub balance_threshold_pct: f64,
}

fn default_min_phrase_hits() -> usize {
    2
}
fn default_symbol_ratio() -> f64 {
    0.3
}
fn default_uppercase_ratio() -> f64 {
    0.7
}
fn default_digit_ratio() -> f64 {
    0.5
}
fn default_min_length() -> usize {
    10
}
fn default_max_length() -> usize {
    5000
}
fn default_balance_threshold() -> f64 {
    5.0
}

impl Default for RelevanceSection {
    fn default() -> Self {
        Self {
            allow_terms: seed_allow_terms(),
            deny_terms: seed_deny_terms(),
        }
    }
}

impl Default for LexiconSection {
    fn default() -> Self {
        Self {
            positive_words: seed_positive_words(),
            negative_words: seed_negative_words(),
        }
    }
}

impl Default for StopwordSection {
    fn default() -> Self {
        Self {
            domain: seed_domain_stopwords(),
        }
    }
}

impl Default for SpamSection {
    fn default() -> Self {
        Self {
            phrases: seed_spam_phrases(),
            min_phrase_hits: default_min_phrase_hits(),
            symbol_ratio: default_symbol_ratio(),
            uppercase_ratio: default_uppercase_ratio(),
            digit_ratio: default_digit_ratio(),
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

impl Default for ComparisonSection {
    fn default() -> Self {
        Self {
            balance_threshold_pct: default_balance_threshold(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::seed()
    }
}

impl AnalyzerConfig {
    /// Built-in seed: the curated Indonesian lexicons and term lists.
    pub fn seed() -> Self {
        Self {
            relevance: RelevanceSection::default(),
            lexicon: LexiconSection::default(),
            stopwords: StopwordSection::default(),
            spam: SpamSection::default(),
            comparison: ComparisonSection::default(),
        }
    }

    /// Parse from a TOML string. Missing sections fall back to the seed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: AnalyzerConfig = toml::from_str(toml_str).context("parsing analyzer config")?;
        Ok(cfg)
    }

    /// Load from an explicit file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load using `$ANALYZER_CONFIG_PATH`, then `config/analyzer.toml`,
    /// then the built-in seed.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            return Self::from_path(&PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::from_path(&default);
        }
        Ok(Self::seed())
    }
}

fn to_vec(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Terms that mark a text as on-topic (Indonesian national team).
fn seed_allow_terms() -> Vec<String> {
    to_vec(&[
        "indonesia",
        "timnas indonesia",
        "garuda",
        "pssi",
        "skuad garuda",
        "shin tae-yong",
        "sty",
    ])
}

/// Terms that mark a text as being about another country's squad.
fn seed_deny_terms() -> Vec<String> {
    to_vec(&[
        "timnas malaysia",
        "timnas thailand",
        "timnas vietnam",
        "timnas singapura",
        "timnas filipina",
        "timnas jepang",
        "timnas korea",
        "timnas china",
        "timnas arab",
        "timnas inggris",
        "timnas perancis",
        "timnas spanyol",
        "timnas jerman",
        "timnas brasil",
        "timnas argentina",
    ])
}

fn seed_positive_words() -> Vec<String> {
    to_vec(&[
        "baik",
        "bagus",
        "hebat",
        "luar biasa",
        "sempurna",
        "positif",
        "senang",
        "gembira",
        "bangga",
        "mendukung",
        "setuju",
        "optimis",
        "sukses",
        "berhasil",
        "cemerlang",
        "gemilang",
        "juara",
        "menang",
        "prestasi",
        "berprestasi",
        "berkualitas",
        "unggul",
        "terbaik",
        "dukungan",
        "apresiasi",
        "mengapresiasi",
        "pujian",
        "memuji",
        "tepat",
        "cocok",
        "sesuai",
        "layak",
        "pantas",
        "profesional",
        "kompeten",
        "potensial",
        "berbakat",
        "talenta",
        "kuat",
        "tangguh",
        "solid",
        "strategis",
        "cerdas",
        "brilian",
        "efektif",
        "efisien",
        "produktif",
        "kontribusi",
        "berkontribusi",
        "membantu",
        "bermanfaat",
        "menguntungkan",
        "profit",
        "untung",
        "maju",
        "berkembang",
        "meningkat",
        "progress",
        "peningkatan",
        "harapan",
        "berharap",
        "optimisme",
        "yakin",
        "percaya",
        "aman",
        "nyaman",
        "stabil",
        "mantap",
        "kokoh",
        "keren",
        "wow",
        "dahsyat",
        "fantastis",
        "luar",
        "biasa",
        "spektakuler",
        "memperkuat",
        "menguatkan",
        "boost",
        "dongkrak",
        "tingkatkan",
        "solutif",
        "solusi",
        "jalan keluar",
        "jawaban",
        "inovasi",
        "inovatif",
        "kreatif",
        "hasil",
        "dampak",
        "support",
        "dukung",
        "backing",
        "sokongan",
        "pro",
        "memihak",
        "sepakat",
        "seia",
        "sekata",
        "sejalan",
        "sependapat",
    ])
}

fn seed_negative_words() -> Vec<String> {
    to_vec(&[
        "buruk",
        "jelek",
        "tidak",
        "gagal",
        "salah",
        "negatif",
        "sedih",
        "kecewa",
        "menolak",
        "tolak",
        "menentang",
        "tentang",
        "protes",
        "demo",
        "demonstrasi",
        "kontra",
        "anti",
        "kritik",
        "mengkritik",
        "lemah",
        "payah",
        "loyo",
        "kalah",
        "kekalahan",
        "hancur",
        "ambruk",
        "roboh",
        "rusak",
        "kerusakan",
        "masalah",
        "problem",
        "problematik",
        "rumit",
        "sulit",
        "susah",
        "berat",
        "bingung",
        "khawatir",
        "was",
        "pesimis",
        "pesimisme",
        "ragu",
        "keraguan",
        "meragukan",
        "diragukan",
        "tidak setuju",
        "kurang",
        "minus",
        "cacat",
        "celah",
        "kesalahan",
        "error",
        "keliru",
        "kacau",
        "chaos",
        "anarkis",
        "brutal",
        "kasar",
        "keras",
        "ekstrim",
        "radikal",
        "berbahaya",
        "bahaya",
        "ancaman",
        "mengancam",
        "merugikan",
        "rugi",
        "kerugian",
        "loss",
        "defisit",
        "turun",
        "menurun",
        "penurunan",
        "jatuh",
        "anjlok",
        "merosot",
        "mundur",
        "kemunduran",
        "stagnan",
        "macet",
        "mandek",
        "buntu",
        "tak",
        "minim",
        "sedikit",
        "kontroversial",
        "kontradiksi",
        "konflik",
        "bentrok",
        "ricuh",
        "menghancurkan",
        "merusak",
        "memperburuk",
        "memperlemah",
        "melemahkan",
        "tidak adil",
        "curang",
        "unfair",
        "diskriminasi",
        "bias",
        "pilih kasih",
        "merampas",
        "mengambil",
        "rebut",
        "slot",
        "kesempatan",
        "peluang",
        "asing",
        "luar",
        "bukan",
        "asli",
        "palsu",
        "tiruan",
        "impor",
        "reject",
        "refuse",
        "tidak mau",
        "tidak suka",
        "benci",
        "prihatin",
        "miris",
        "menyedihkan",
        "mengecewakan",
        "menyesal",
    ])
}

/// Domain terms that dominate every document and carry no polarity.
fn seed_domain_stopwords() -> Vec<String> {
    to_vec(&[
        "timnas",
        "indonesia",
        "sepak",
        "bola",
        "pemain",
        "naturalisasi",
        "jakarta",
        "surabaya",
        "bandung",
        "artikel",
        "berita",
        "news",
        "com",
        "detik",
        "kompas",
        "tribun",
        "cnn",
        "republika",
    ])
}

fn seed_spam_phrases() -> Vec<String> {
    to_vec(&[
        "subscribe",
        "like",
        "comment",
        "share",
        "link in bio",
        "check description",
        "visit my channel",
        "follow me",
        "giveaway",
        "promo",
        "diskon",
        "beli sekarang",
        "jual",
        "jualan",
        "iklan",
        "advertisement",
    ])
}
