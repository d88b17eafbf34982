//! One OS thread per URL.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::{Strategy, THREADING_PREFIX};
use crate::fetcher::{DownloadTask, Fetcher};
use crate::orchestrator::RunPlan;
use crate::report;

/// Spawns a thread per URL, each running the shared blocking fetcher, then joins
/// them all. The reported time spans the whole fetch, request included.
pub struct ThreadRunner {
    fetcher: Arc<dyn Fetcher>,
}

impl ThreadRunner {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// Join every handle. A panicked thread is logged and otherwise ignored.
fn join_all(handles: Vec<(String, JoinHandle<()>)>) {
    for (url, handle) in handles {
        if let Err(e) = handle.join() {
            tracing::warn!(url = %url, "download thread panicked: {:?}", e);
        }
    }
}

impl Strategy for ThreadRunner {
    fn name(&self) -> &'static str {
        "threading"
    }

    fn run(&self, plan: &RunPlan) -> Result<()> {
        let mut handles = Vec::with_capacity(plan.urls.len());

        for (i, task) in plan.tasks(THREADING_PREFIX).enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let url = task.url.clone();
            let spawned = thread::Builder::new()
                .name(format!("fetch-{i}"))
                .spawn(move || fetch_and_report(fetcher.as_ref(), &task));
            match spawned {
                Ok(handle) => handles.push((url, handle)),
                Err(e) => {
                    join_all(handles);
                    return Err(e).with_context(|| format!("failed to start thread for {url}"));
                }
            }
        }

        tracing::debug!(threads = handles.len(), "all download threads started");
        join_all(handles);
        Ok(())
    }
}

fn fetch_and_report(fetcher: &dyn Fetcher, task: &DownloadTask) {
    let started = Instant::now();
    let result = fetcher.fetch(task);
    report::outcome("threading", &result, started.elapsed());
}
