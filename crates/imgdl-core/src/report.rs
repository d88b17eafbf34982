//! Console lines for download outcomes.
//!
//! Outcomes are printed to stdout as they happen and mirrored into the log.
//! Nothing is aggregated: a line per attempt is the only record of a result.

use std::time::Duration;

use crate::fetcher::FetchResult;

/// Line printed for a successful download.
pub fn success_line(path: &std::path::Path, elapsed: Duration) -> String {
    format!(
        "Image {} downloaded in {:.2} seconds",
        path.display(),
        elapsed.as_secs_f64()
    )
}

/// Print the outcome of one fetch. `elapsed` is whatever span the strategy
/// chose to measure; see the strategy modules for which one that is.
pub fn outcome(strategy: &str, result: &FetchResult, elapsed: Duration) {
    match result {
        Ok(saved) => {
            println!("{}", success_line(&saved.path, elapsed));
            tracing::info!(
                strategy,
                path = %saved.path.display(),
                bytes = saved.bytes,
                elapsed_ms = elapsed.as_millis() as u64,
                "download complete"
            );
        }
        Err(e) => {
            println!("{}", capitalize(&e.to_string()));
            tracing::warn!(strategy, url = e.url(), "{}", e);
        }
    }
}

/// Print the end-of-phase timing line.
pub fn phase_finished(phase: &str, elapsed: Duration) {
    println!("{} phase finished in {:.2} seconds", phase, elapsed.as_secs_f64());
    tracing::info!(phase, elapsed_ms = elapsed.as_millis() as u64, "phase finished");
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
