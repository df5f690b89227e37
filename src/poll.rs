// src/poll.rs

use anyhow::{Context, Result};
use futures::{stream::FuturesUnordered, StreamExt};
use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::extract::{Extraction, Extractor};
use crate::fetch::Fetcher;
use crate::output::{write_plan, PlanDocument};
use crate::records::FieldLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub url: Url,
    pub path: PathBuf,
    pub entries: usize,
    pub records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub entries: usize,
    pub records: usize,
}

/// Fetch, extract and write plan documents.
#[derive(Debug, Clone)]
pub struct Poller {
    fetcher: Fetcher,
    extractor: Arc<Extractor>,
    layout: Arc<FieldLayout>,
    out_dir: PathBuf,
    concurrency: usize,
}

impl Poller {
    pub fn new(
        fetcher: Fetcher,
        extractor: Extractor,
        layout: FieldLayout,
        out_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            layout: Arc::new(layout),
            out_dir: out_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    #[instrument(level = "info", skip(self, url), fields(url = %url))]
    pub async fn process_document(&self, url: &Url) -> Result<DocumentSummary> {
        let start = Instant::now();
        let html = self.fetcher.fetch_with_retry(url).await?;

        // tree building is CPU-bound; keep it off the reactor
        let extractor = Arc::clone(&self.extractor);
        let extraction = tokio::task::spawn_blocking(move || extractor.extract(&html))
            .await
            .context("extraction task panicked")?;

        let doc = PlanDocument::new(url.as_str(), extraction, &self.layout);
        let path = write_plan(&self.out_dir, &doc).await?;
        info!(
            title = %doc.title,
            entries = doc.entries.len(),
            records = doc.records.len(),
            elapsed = ?start.elapsed(),
            "wrote {}",
            path.display()
        );
        Ok(DocumentSummary {
            url: url.clone(),
            path,
            entries: doc.entries.len(),
            records: doc.records.len(),
        })
    }

    /// Process every URL with at most `concurrency` in flight. A failing
    /// document is logged and counted; it does not stop the others.
    pub async fn run_cycle(&self, urls: &[Url]) -> CycleSummary {
        let mut summary = CycleSummary::default();
        let mut tasks = FuturesUnordered::new();
        let mut pending = urls.iter();

        loop {
            while tasks.len() < self.concurrency {
                let Some(url) = pending.next() else { break };
                tasks.push(async move { (url, self.process_document(url).await) });
            }
            let Some((url, res)) = tasks.next().await else { break };
            match res {
                Ok(doc) => {
                    summary.succeeded += 1;
                    summary.entries += doc.entries;
                    summary.records += doc.records;
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(%url, error = %format!("{:#}", e), "document failed");
                }
            }
        }
        summary
    }

    /// Poll `urls` every `every` until a shutdown signal, or once.
    pub async fn run(&self, urls: &[Url], every: Duration, once: bool) -> Result<()> {
        self.run_until(urls, every, once, shutdown_signal()).await
    }

    /// Like `run`, stopping when `shutdown` resolves. A cycle still in
    /// flight at that point is dropped, in-progress fetches included.
    pub async fn run_until<F>(
        &self,
        urls: &[Url],
        every: Duration,
        once: bool,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                res = &mut shutdown => {
                    res?;
                    info!("Got shutdown signal");
                    return Ok(());
                }
            }

            let start = Instant::now();
            tokio::select! {
                s = self.run_cycle(urls) => {
                    info!(
                        ok = s.succeeded,
                        failed = s.failed,
                        entries = s.entries,
                        records = s.records,
                        elapsed = ?start.elapsed(),
                        "cycle done"
                    );
                    if once {
                        return Ok(());
                    }
                }
                res = &mut shutdown => {
                    res?;
                    warn!(elapsed = ?start.elapsed(), "Got shutdown signal, abandoning cycle");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.context("waiting for ctrl-c")?,
        _ = term.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    Ok(())
}

/// Extract local files; used by `--file`.
pub fn extract_files(
    extractor: &Extractor,
    files: &[PathBuf],
) -> Result<Vec<(PathBuf, Extraction)>> {
    files
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).with_context(|| format!("reading {:?}", path))?;
            let extraction = extractor
                .extract_bytes(&bytes)
                .with_context(|| format!("extracting {:?}", path))?;
            if extraction.entries.is_empty() {
                warn!(path = %path.display(), "no class entries found");
            }
            Ok((path.clone(), extraction))
        })
        .collect()
}
