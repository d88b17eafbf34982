//! One tokio task per URL on a single-threaded event loop.

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use super::{Strategy, ASYNCIO_PREFIX};
use crate::config::FetchConfig;
use crate::fetcher::nonblocking::{build_client, AsyncFetcher};
use crate::orchestrator::RunPlan;
use crate::report;

/// Runs every download as a task on a current-thread runtime built for the
/// phase. All tasks share one pooled client, dropped when the phase ends.
///
/// The reported time is the fetcher's write window, not the whole call as in
/// the thread and process strategies.
pub struct AsyncRunner {
    config: FetchConfig,
}

impl AsyncRunner {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    async fn run_all(&self, plan: &RunPlan) -> Result<()> {
        let client = build_client(&self.config).context("failed to build HTTP client")?;
        let fetcher = AsyncFetcher::new(client);

        // Spawned tasks start as soon as the loop gets control; no lazy futures.
        let handles: Vec<(String, JoinHandle<()>)> = plan
            .tasks(ASYNCIO_PREFIX)
            .map(|task| {
                let fetcher = fetcher.clone();
                let url = task.url.clone();
                let handle = tokio::spawn(async move {
                    let result = fetcher.fetch(&task).await;
                    let elapsed = result
                        .as_ref()
                        .map(|saved| saved.write_elapsed)
                        .unwrap_or_default();
                    report::outcome("asyncio", &result, elapsed);
                });
                (url, handle)
            })
            .collect();
        drop(fetcher);

        let mut first_fault = None;
        for (url, handle) in handles {
            if let Err(e) = handle.await {
                tracing::warn!(url = %url, "download task failed: {}", e);
                if first_fault.is_none() {
                    first_fault = Some(anyhow::anyhow!("download task for {url} failed: {e}"));
                }
            }
        }
        match first_fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Strategy for AsyncRunner {
    fn name(&self) -> &'static str {
        "asyncio"
    }

    fn run(&self, plan: &RunPlan) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build event loop")?;
        runtime.block_on(self.run_all(plan))
    }
}
