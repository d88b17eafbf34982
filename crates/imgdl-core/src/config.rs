//! Transport settings shared by both fetchers.
//!
//! Nothing is read implicitly: a config file is only loaded when the user
//! passes one explicitly, and nothing is ever written back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// HTTP settings applied to every GET, blocking or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Whole-request limit in seconds; `None` lets a transfer run as long as it needs.
    pub timeout_secs: Option<u64>,
    /// Redirect hops followed before giving up.
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: None,
            max_redirects: 10,
            user_agent: format!("imgdl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load settings from an explicit TOML file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<FetchConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Defaults unless `path` is given.
pub fn load_or_default(path: Option<&Path>) -> Result<FetchConfig, ConfigError> {
    match path {
        Some(p) => {
            let cfg = load_from_path(p)?;
            tracing::debug!("loaded config from {}: {:?}", p.display(), cfg);
            Ok(cfg)
        }
        None => Ok(FetchConfig::default()),
    }
}
