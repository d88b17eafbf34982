//! `imgdl fetch-worker` – one download in a child process.

use anyhow::Result;
use imgdl_core::config;
use imgdl_core::fetcher::{CurlFetcher, DownloadTask};
use imgdl_core::strategy::processes::run_worker;
use std::path::Path;

/// Always succeeds once the config is loaded: a failed download is reported on
/// stdout, never through the exit status.
pub fn run_fetch_worker(
    config_path: Option<&Path>,
    prefix: &str,
    url: &str,
    output_folder: &Path,
) -> Result<()> {
    let cfg = config::load_or_default(config_path)?;
    let task = DownloadTask::new(url, output_folder, prefix);
    tracing::debug!(pid = std::process::id(), url, "worker started");
    run_worker(&CurlFetcher::new(cfg), &task);
    Ok(())
}
