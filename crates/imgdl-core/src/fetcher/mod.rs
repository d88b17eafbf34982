//! Single URL → file downloads.
//!
//! A fetch never panics or propagates: every outcome, including transport and
//! disk faults, comes back as a [`FetchResult`] for the caller to report.
//! `blocking` serves the thread and process strategies; `nonblocking` serves the
//! async strategy through a shared pooled client.

pub mod blocking;
pub mod nonblocking;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::url_model;

pub use blocking::CurlFetcher;
pub use nonblocking::AsyncFetcher;

/// One unit of work: download `url` into `output_folder` under `prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub output_folder: PathBuf,
    pub prefix: String,
}

impl DownloadTask {
    pub fn new(
        url: impl Into<String>,
        output_folder: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            output_folder: output_folder.into(),
            prefix: prefix.into(),
        }
    }

    /// `output_folder/{prefix}{basename(url)}`.
    pub fn output_path(&self) -> PathBuf {
        self.output_folder.join(url_model::file_name(&self.url, &self.prefix))
    }
}

/// A body that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
    /// Time spent allocating the output path and writing it. Request latency is
    /// never included.
    pub write_elapsed: Duration,
}

/// Why a fetch produced no file.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Server answered with something other than 200.
    #[error("failed to download image from {url}: HTTP {status}")]
    Status { url: String, status: u32 },
    /// DNS, connect, timeout, reset, malformed URL, too many redirects.
    #[error("error downloading image from {url}: {message}")]
    Transport { url: String, message: String },
    /// The body arrived but couldn't be written.
    #[error("error saving image from {url} to {}: {source}", .path.display())]
    Io {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Io { url, .. } => url,
        }
    }
}

pub type FetchResult = Result<SavedFile, FetchError>;

/// Blocking download seam. The thread strategy holds one behind an `Arc` and
/// calls it from every worker thread.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, task: &DownloadTask) -> FetchResult;
}

/// Write `body` to `path`, creating or truncating it.
pub(crate) fn write_body(url: &str, path: &Path, body: &[u8]) -> Result<(), FetchError> {
    fs::write(path, body).map_err(|source| FetchError::Io {
        url: url.to_string(),
        path: path.to_path_buf(),
        source,
    })
}

/// Allocate the output path for `task` and write `body`, timing just that window.
pub(crate) fn save(task: &DownloadTask, body: &[u8]) -> FetchResult {
    let started = Instant::now();
    let path = task.output_path();
    write_body(&task.url, &path, body)?;
    Ok(SavedFile {
        path,
        bytes: body.len() as u64,
        write_elapsed: started.elapsed(),
    })
}
