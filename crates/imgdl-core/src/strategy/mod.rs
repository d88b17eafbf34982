//! The three ways of running one download per URL.
//!
//! Every strategy fans out one unit of work per URL with no cap, then blocks
//! until all of them have terminated. Results are never collected: each unit
//! reports its own outcome and the files on disk are the only output.
//!
//! | strategy    | unit of work         | prefix             |
//! |-------------|----------------------|--------------------|
//! | threads     | OS thread            | `threading_`       |
//! | processes   | OS process           | `multiprocessing_` |
//! | cooperative | tokio task, 1 thread | `asyncio_`         |

pub mod cooperative;
pub mod processes;
pub mod threads;

use anyhow::Result;

use crate::orchestrator::RunPlan;

pub use cooperative::AsyncRunner;
pub use processes::{ProcessRunner, WorkerCommand};
pub use threads::ThreadRunner;

pub const THREADING_PREFIX: &str = "threading_";
pub const MULTIPROCESSING_PREFIX: &str = "multiprocessing_";
pub const ASYNCIO_PREFIX: &str = "asyncio_";

/// One phase of a run.
pub trait Strategy {
    /// Short label used in console lines and logs.
    fn name(&self) -> &'static str;

    /// Download every URL in `plan` and return once every unit has terminated.
    /// Per-download failures are reported, not returned; `Err` means the phase
    /// itself broke (e.g. a thread or process could not be started).
    fn run(&self, plan: &RunPlan) -> Result<()>;
}

#[cfg(test)]
mod tests;
