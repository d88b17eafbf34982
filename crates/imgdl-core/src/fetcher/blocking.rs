//! Blocking single GET via libcurl.
//!
//! The body is collected in memory during the transfer and only written once the
//! status is known to be 200, so a failed request never leaves a file behind.

use std::time::Duration;

use super::{save, DownloadTask, FetchError, FetchResult, Fetcher};
use crate::config::FetchConfig;

/// Fetcher for the thread and process strategies. Each call uses its own Easy
/// handle; the struct only carries settings, so it is freely shared.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    config: FetchConfig,
}

impl CurlFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Perform the GET and return (status, body).
    fn get(&self, url: &str) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.config.max_redirects)?;
        easy.useragent(&self.config.user_agent)?;
        easy.connect_timeout(self.config.connect_timeout())?;
        // 0 disables the overall limit in libcurl.
        easy.timeout(self.config.timeout().unwrap_or(Duration::ZERO))?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, task: &DownloadTask) -> FetchResult {
        let (status, body) = self.get(&task.url).map_err(|e| FetchError::Transport {
            url: task.url.clone(),
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(FetchError::Status {
                url: task.url.clone(),
                status,
            });
        }

        save(task, &body)
    }
}
