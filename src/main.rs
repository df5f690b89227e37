use anyhow::{Context, Result};
use clap::Parser;
use dsbplan::{
    config::Config,
    extract::Extractor,
    fetch::Fetcher,
    poll::{extract_files, Poller},
};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    cfg.validate()?;
    let extractor = Extractor::new(cfg.title_class.clone());

    // ─── 2) local files: extract once, print JSON ────────────────────
    if !cfg.files.is_empty() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for (path, extraction) in extract_files(&extractor, &cfg.files)? {
            info!(path = %path.display(), entries = extraction.entries.len(), "extracted");
            serde_json::to_writer_pretty(&mut out, &extraction)?;
            writeln!(out)?;
        }
        if cfg.urls.is_empty() {
            return Ok(());
        }
    }

    // ─── 3) poll plan URLs ───────────────────────────────────────────
    let fetcher = Fetcher::new(cfg.timeout(), cfg.max_retries, cfg.backoff_ms)
        .context("setting up HTTP client")?;
    let poller = Poller::new(
        fetcher,
        extractor,
        cfg.layout.clone(),
        &cfg.out_dir,
        cfg.concurrency,
    );
    info!(
        urls = cfg.urls.len(),
        every = ?cfg.interval(),
        out = %poller.out_dir().display(),
        "startup"
    );
    poller.run(&cfg.urls, cfg.interval(), cfg.once).await?;

    info!("Shutting down gracefully");
    Ok(())
}
