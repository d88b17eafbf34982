//! Logging init: append-only file under the XDG state dir, or stderr as a fallback.
//!
//! Worker processes spawned by the process strategy call the same initializer,
//! so every phase ends up in one log file.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,imgdl=debug,imgdl_core=debug";

/// Log sink handed out per event: the shared file, or stderr when the handle can't be cloned.
enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct SharedFile(fs::File);

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Location of the log file: `~/.local/state/imgdl/imgdl.log` unless XDG says otherwise.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.get_state_home().join("imgdl.log"))
}

/// Initialize structured logging to the XDG state log file.
/// Returns Err (without installing a subscriber) when the file can't be opened,
/// so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let log_file_path = log_file_path()?;
    if let Some(dir) = log_file_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(SharedFile(file)))
        .with_ansi(false)
        .init();

    tracing::debug!(pid = std::process::id(), "logging to {}", log_file_path.display());

    Ok(log_file_path)
}

/// Initialize logging to stderr only.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
