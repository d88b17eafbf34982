pub mod config;
pub mod logging;

pub mod fetcher;
pub mod orchestrator;
pub mod report;
pub mod strategy;
pub mod url_model;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
