// src/output.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
};
use tokio::fs;

use crate::extract::{ClassEntry, Extraction};
use crate::records::{all_records, FieldLayout, PlanDay, Substitution};

/// Everything written for one plan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub title: String,
    pub day: PlanDay,
    pub entries: Vec<ClassEntry>,
    pub records: Vec<Substitution>,
}

impl PlanDocument {
    pub fn new(source: impl Into<String>, extraction: Extraction, layout: &FieldLayout) -> Self {
        let records = all_records(&extraction.entries, layout);
        Self {
            source: source.into(),
            fetched_at: Utc::now(),
            day: PlanDay::parse(&extraction.title),
            title: extraction.title,
            entries: extraction.entries,
            records,
        }
    }
}

/// File stem for a source URL or path: ASCII alphanumerics kept, runs of
/// anything else collapsed to `_`.
pub fn slug(source: &str) -> String {
    let trimmed = source
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(source);
    let mut out = String::with_capacity(trimmed.len());
    let mut last_us = false;
    for ch in trimmed.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' {
            out.push(ch);
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }
    let out = out.trim_matches('_');
    if out.is_empty() {
        "plan".to_string()
    } else {
        out.to_string()
    }
}

/// `slug` plus the first 12 hex digits of the source's SHA-256, so sources
/// that slug alike still get their own file.
pub fn file_stem(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}-{}", slug(source), &digest[..12])
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Write `doc` as pretty JSON to `<dir>/<file_stem>.json`, replacing any
/// previous version in one rename.
pub async fn write_plan(dir: &Path, doc: &PlanDocument) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {:?}", dir))?;

    let name = file_stem(&doc.source);
    let path = dir.join(format!("{}.json", name));
    // one temp file per write; the same source may be written twice at once
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(".{}.{}.{}.tmp", name, process::id(), seq));

    let json = serde_json::to_vec_pretty(doc).context("serialising plan")?;
    fs::write(&tmp, &json)
        .await
        .with_context(|| format!("writing {:?}", tmp))?;
    fs::rename(&tmp, &path)
        .await
        .with_context(|| format!("renaming {:?} -> {:?}", tmp, path))?;
    Ok(path)
}
