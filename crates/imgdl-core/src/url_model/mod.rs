//! Output filename derivation: `{prefix}{basename(url)}`.

mod path;
mod sanitize;

pub use path::basename;
pub use sanitize::sanitize_basename;

/// Used only when the whole name would otherwise be empty, `.` or `..`.
pub const DEFAULT_FILE_NAME: &str = "download.bin";

/// Derives the on-disk name for `url` under a strategy `prefix`.
///
/// The basename is the raw text after the last `/`, query string included, so
/// `a.jpg?v=1` and `a.jpg?v=2` land in different files. A URL ending in `/` has
/// an empty basename and the file is named after the prefix alone.
///
/// # Examples
///
/// - `file_name("http://x/a.jpg", "threading_")` → `"threading_a.jpg"`
/// - `file_name("http://x/a.jpg?v=2", "asyncio_")` → `"asyncio_a.jpg?v=2"`
/// - `file_name("https://example.com/", "asyncio_")` → `"asyncio_"`
pub fn file_name(url: &str, prefix: &str) -> String {
    let name = format!("{prefix}{}", sanitize_basename(basename(url)));
    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_FILE_NAME.to_string()
    } else {
        name
    }
}
