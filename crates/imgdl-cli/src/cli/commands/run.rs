//! `imgdl [OUTPUT_FOLDER] [URLS]...` – run all three phases.

use anyhow::{Context, Result};
use imgdl_core::config;
use imgdl_core::orchestrator::{Orchestrator, RunPlan};
use imgdl_core::strategy::WorkerCommand;
use std::path::{Path, PathBuf};

/// Worker launcher for the process phase: this same executable in worker mode.
fn worker_command(config_path: Option<&Path>) -> Result<WorkerCommand> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let mut worker = WorkerCommand::new(exe).arg("fetch-worker");
    if let Some(path) = config_path {
        worker = worker.arg("--config").arg(path);
    }
    Ok(worker)
}

pub fn run_all_phases(
    config_path: Option<&Path>,
    output_folder: Option<PathBuf>,
    urls: Vec<String>,
) -> Result<()> {
    let cfg = config::load_or_default(config_path)?;
    let plan = RunPlan::resolve(output_folder, urls)?;
    tracing::debug!("resolved plan: {:?}", plan);

    let orchestrator = Orchestrator::standard(&cfg, worker_command(config_path)?);
    orchestrator.run(&plan)?;

    tracing::info!("run completed for {} url(s)", plan.urls.len());
    Ok(())
}
