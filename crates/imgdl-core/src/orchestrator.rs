//! Resolve what to download, then run each strategy as a strictly sequential phase.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::FetchConfig;
use crate::fetcher::{CurlFetcher, DownloadTask};
use crate::report;
use crate::strategy::{AsyncRunner, ProcessRunner, Strategy, ThreadRunner, WorkerCommand};

/// Used when no URLs are given.
pub const DEFAULT_URLS: [&str; 3] = [
    "https://images.wallpaperscraft.ru/image/single/list_zelenyj_makro_1015853_1920x1080.jpg",
    "https://img2.akspic.ru/attachments/crops/0/3/3/1/7/171330/171330-voda-priroda-zemlya-derevo-vodoem-3840x2160.jpg",
    "https://w.forfun.com/fetch/d7/d7da5336cdec973bb1dc28fc4ad0f93a.jpeg",
];

/// Inputs for a whole run, fixed before the first phase starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub output_folder: PathBuf,
    pub urls: Vec<String>,
}

impl RunPlan {
    /// Fill in defaults: the executable's own directory for a missing (or empty)
    /// folder, and [`DEFAULT_URLS`] for an empty URL list.
    pub fn resolve(output_folder: Option<PathBuf>, urls: Vec<String>) -> Result<Self> {
        let output_folder = match output_folder.filter(|p| !p.as_os_str().is_empty()) {
            Some(p) => p,
            None => program_dir()?,
        };
        let urls = if urls.is_empty() {
            DEFAULT_URLS.iter().map(|u| u.to_string()).collect()
        } else {
            urls
        };
        Ok(Self { output_folder, urls })
    }

    /// One task per URL, in input order.
    pub fn tasks<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = DownloadTask> + 'a {
        self.urls
            .iter()
            .map(move |url| DownloadTask::new(url.clone(), self.output_folder.clone(), prefix))
    }
}

/// Directory holding the running executable.
fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .with_context(|| format!("{} has no parent directory", exe.display()))
}

pub struct Orchestrator {
    phases: Vec<Box<dyn Strategy>>,
}

impl Orchestrator {
    /// Threads, then processes, then async tasks.
    pub fn standard(config: &FetchConfig, worker: WorkerCommand) -> Self {
        let fetcher = Arc::new(CurlFetcher::new(config.clone()));
        let phases: Vec<Box<dyn Strategy>> = vec![
            Box::new(ThreadRunner::new(fetcher)),
            Box::new(ProcessRunner::new(worker)),
            Box::new(AsyncRunner::new(config.clone())),
        ];
        Self::with_phases(phases)
    }

    pub fn with_phases(phases: Vec<Box<dyn Strategy>>) -> Self {
        Self { phases }
    }

    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Run every phase to completion, one after another. A phase that fails to
    /// run stops the whole run; failed downloads do not.
    pub fn run(&self, plan: &RunPlan) -> Result<()> {
        tracing::info!(
            urls = plan.urls.len(),
            folder = %plan.output_folder.display(),
            "starting run"
        );
        for phase in &self.phases {
            let name = phase.name();
            tracing::info!(phase = name, "phase started");
            let started = Instant::now();
            phase
                .run(plan)
                .with_context(|| format!("{name} phase failed"))?;
            report::phase_finished(name, started.elapsed());
        }
        Ok(())
    }
}
