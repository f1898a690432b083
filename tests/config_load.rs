// tests/config_load.rs
//
// Config resolution order: env-pointed file first, then the shipped default
// path, then the built-in seed. Env mutation forces serial execution.

use std::io::Write as _;

use serial_test::serial;

use timnas_sentiment_analyzer::config::{AnalyzerConfig, ENV_CONFIG_PATH};

#[test]
#[serial]
fn env_path_overrides_everything() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[relevance]
allow_terms = ["garuda"]
deny_terms = []

[spam]
min_length = 3
"#
    )
    .unwrap();

    std::env::set_var(ENV_CONFIG_PATH, file.path());
    let cfg = AnalyzerConfig::load_default().unwrap();
    std::env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(cfg.relevance.allow_terms, vec!["garuda".to_string()]);
    assert!(cfg.relevance.deny_terms.is_empty());
    assert_eq!(cfg.spam.min_length, 3);
    // untouched sections keep the seeded lists
    assert!(!cfg.lexicon.positive_words.is_empty());
    assert!(!cfg.stopwords.domain.is_empty());
}

#[test]
#[serial]
fn env_path_to_missing_file_is_an_error() {
    std::env::set_var(ENV_CONFIG_PATH, "/definitely/not/here.toml");
    let result = AnalyzerConfig::load_default();
    std::env::remove_var(ENV_CONFIG_PATH);
    assert!(result.is_err());
}

#[test]
#[serial]
fn unparseable_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not toml [[[").unwrap();

    std::env::set_var(ENV_CONFIG_PATH, file.path());
    let result = AnalyzerConfig::load_default();
    std::env::remove_var(ENV_CONFIG_PATH);
    assert!(result.is_err());
}

#[test]
#[serial]
fn shipped_default_config_parses() {
    // the repo ships config/analyzer.toml; it must stay loadable
    let cfg = AnalyzerConfig::from_path(std::path::Path::new("config/analyzer.toml")).unwrap();
    assert!(cfg.relevance.allow_terms.contains(&"garuda".to_string()));
    assert!((cfg.comparison.balance_threshold_pct - 5.0).abs() < f64::EPSILON);
}
