//! Basename extraction from URLs.

/// Text after the last `/` of `url`, taken verbatim: query and fragment stay,
/// and a trailing `/` yields an empty string.
pub fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
