//! # Export
//! JSON result files for downstream analysis. Writes go through a temp file
//! plus rename so a crash mid-write never leaves a truncated export behind.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::aggregate::Summary;
use crate::record::Record;

pub const DEFAULT_EXPORT_DIR: &str = "out";
pub const ENV_EXPORT_DIR: &str = "ANALYZER_EXPORT_DIR";

#[derive(Debug, Serialize)]
struct RecordsFile<'a> {
    generated_at: chrono::DateTime<Utc>,
    count: usize,
    records: &'a [Record],
}

#[derive(Debug, Serialize)]
struct SummaryFile<'a> {
    generated_at: chrono::DateTime<Utc>,
    summary: &'a Summary,
}

pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$ANALYZER_EXPORT_DIR`, falling back to `out/`.
    pub fn from_env() -> Self {
        let dir = std::env::var(ENV_EXPORT_DIR).unwrap_or_else(|_| DEFAULT_EXPORT_DIR.to_string());
        Self::new(dir)
    }

    pub fn write_records(&self, records: &[Record]) -> Result<PathBuf> {
        let path = self.dir.join("records.json");
        write_json_atomic(
            &path,
            &RecordsFile {
                generated_at: Utc::now(),
                count: records.len(),
                records,
            },
        )?;
        info!(target: "export", path = %path.display(), count = records.len(), "records written");
        Ok(path)
    }

    pub fn write_summary(&self, summary: &Summary) -> Result<PathBuf> {
        let path = self.dir.join("summary.json");
        write_json_atomic(
            &path,
            &SummaryFile {
                generated_at: Utc::now(),
                summary,
            },
        )?;
        info!(target: "export", path = %path.display(), "summary written");
        Ok(path)
    }
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating export dir {}", parent.display()))?;
    }
    let body = serde_json::to_vec_pretty(value).context("serializing export")?;

    let tmp = path.with_extension("json.tmp");
    let mut f = fs::File::create(&tmp)
        .with_context(|| format!("creating temp export {}", tmp.display()))?;
    f.write_all(&body)
        .with_context(|| format!("writing temp export {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("publishing export {}", path.display()))?;
    Ok(())
}
