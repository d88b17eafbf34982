//! CLI command handlers.

mod run;
mod worker;

pub use run::run_all_phases;
pub use worker::run_fetch_worker;
