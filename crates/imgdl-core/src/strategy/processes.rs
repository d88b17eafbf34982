//! One OS process per URL.
//!
//! The parent never receives anything from a child but its exit status; the
//! worker writes its file and prints its own outcome line. Children are the
//! current executable re-invoked in worker mode, described by a [`WorkerCommand`].

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Instant;

use super::{Strategy, MULTIPROCESSING_PREFIX};
use crate::fetcher::{DownloadTask, Fetcher};
use crate::orchestrator::RunPlan;
use crate::report;

/// How to launch a worker: a program plus leading arguments. The task is
/// appended as `--prefix <PREFIX> <URL> <OUTPUT_FOLDER>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Full command line for one task.
    pub fn command_for(&self, task: &DownloadTask) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--prefix")
            .arg(&task.prefix)
            .arg(&task.url)
            .arg(&task.output_folder)
            .stdin(Stdio::null());
        cmd
    }
}

pub struct ProcessRunner {
    worker: WorkerCommand,
}

impl ProcessRunner {
    pub fn new(worker: WorkerCommand) -> Self {
        Self { worker }
    }
}

/// Wait for every child. Exit status is logged only.
fn wait_all(children: Vec<(String, Child)>) {
    for (url, mut child) in children {
        match child.wait() {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::warn!(url = %url, pid = child.id(), "worker exited with {}", status),
            Err(e) => tracing::warn!(url = %url, pid = child.id(), "failed to wait for worker: {}", e),
        }
    }
}

impl Strategy for ProcessRunner {
    fn name(&self) -> &'static str {
        "multiprocessing"
    }

    fn run(&self, plan: &RunPlan) -> Result<()> {
        let mut children = Vec::with_capacity(plan.urls.len());

        for task in plan.tasks(MULTIPROCESSING_PREFIX) {
            match self.worker.command_for(&task).spawn() {
                Ok(child) => {
                    tracing::debug!(url = %task.url, pid = child.id(), "worker started");
                    children.push((task.url, child));
                }
                Err(e) => {
                    wait_all(children);
                    return Err(e).with_context(|| format!("failed to start worker for {}", task.url));
                }
            }
        }

        wait_all(children);
        Ok(())
    }
}

/// Body of a worker process: one fetch, timed end to end, reported to stdout.
pub fn run_worker(fetcher: &dyn Fetcher, task: &DownloadTask) {
    let started = Instant::now();
    let result = fetcher.fetch(task);
    report::outcome("multiprocessing", &result, started.elapsed());
}
