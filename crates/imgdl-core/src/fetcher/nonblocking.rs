//! Non-blocking GET over a shared pooled `reqwest::Client`.
//!
//! Suspends at `send()` and at the body read; between those points the event
//! loop is free to drive other downloads on the same thread.

use std::time::Instant;

use reqwest::Client;

use super::{write_body, DownloadTask, FetchError, FetchResult, SavedFile};
use crate::config::FetchConfig;

fn transport(url: &str, e: reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    }
}

/// Build the session shared by every task of one async run.
pub fn build_client(config: &FetchConfig) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize));
    if let Some(t) = config.timeout() {
        builder = builder.timeout(t);
    }
    builder.build()
}

/// Async counterpart of [`CurlFetcher`](super::CurlFetcher). Cloning is cheap and
/// every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct AsyncFetcher {
    client: Client,
}

impl AsyncFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, task: &DownloadTask) -> FetchResult {
        let response = self
            .client
            .get(&task.url)
            .send()
            .await
            .map_err(|e| transport(&task.url, e))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status {
                url: task.url.clone(),
                status: u32::from(status),
            });
        }

        // NOTE: known inconsistency: this window covers the body read, while the
        // blocking fetcher has the whole body before its clock starts.
        let started = Instant::now();
        let path = task.output_path();
        let body = response.bytes().await.map_err(|e| transport(&task.url, e))?;
        // Plain std write: the async phase stays on one thread.
        write_body(&task.url, &path, &body)?;

        Ok(SavedFile {
            path,
            bytes: body.len() as u64,
            write_elapsed: started.elapsed(),
        })
    }
}
