// src/config.rs

use anyhow::{bail, Result};
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::extract::DEFAULT_TITLE_CLASS;
use crate::records::FieldLayout;

/// Poll substitution plan pages and write their entries as JSON.
#[derive(Debug, Clone, Parser)]
#[command(name = "dsbplan", version, about)]
pub struct Config {
    /// Plan document URLs to poll.
    #[arg(env = "DSB_PLAN_URLS", value_delimiter = ',')]
    pub urls: Vec<Url>,

    /// Extract local HTML files once and print the result; no network.
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    #[arg(long, env = "DSB_POLL_INTERVAL", default_value_t = 15)]
    pub interval_secs: u64,

    /// Run a single poll cycle and exit.
    #[arg(long)]
    pub once: bool,

    /// Documents fetched and extracted at the same time.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    #[arg(long, env = "DSB_OUT_DIR", default_value = "plans")]
    pub out_dir: PathBuf,

    /// `class` of the div holding the plan date.
    #[arg(long, default_value = DEFAULT_TITLE_CLASS)]
    pub title_class: String,

    /// Record field per period slot, `-` to skip one.
    #[arg(long, default_value_t = FieldLayout::default())]
    pub layout: FieldLayout,

    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    #[arg(long, default_value_t = 500)]
    pub backoff_ms: u64,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Used when RUST_LOG is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.urls.is_empty() && self.files.is_empty() {
            bail!("nothing to do: pass plan URLs (or DSB_PLAN_URLS) or --file");
        }
        if self.interval_secs == 0 {
            bail!("--interval-secs must be at least 1");
        }
        if self.concurrency == 0 {
            bail!("--concurrency must be at least 1");
        }
        if self.title_class.trim().is_empty() {
            bail!("--title-class must not be empty");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
