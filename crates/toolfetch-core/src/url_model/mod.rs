//! URL basename extraction and job filename derivation.
//!
//! Destination filenames are `{name}_{basename(url)}`, sanitized for Linux
//! filesystems.

mod path;
mod sanitize;

pub use path::url_basename;
pub use sanitize::{sanitize_filename_for_linux, truncate_on_char_boundary, NAME_MAX};

/// Basename used when the URL has no usable last path segment.
pub const DEFAULT_BASENAME: &str = "download.bin";

/// Derives the local filename for a job: `{name}_{basename(url)}`.
///
/// The URL's last non-empty path segment is used (query and fragment are
/// ignored); when there is none, `download.bin` stands in. The joined name is
/// sanitized, so it never contains `/`, NUL, control characters or whitespace.
///
/// # Examples
///
/// - `job_filename("ripgrep", "https://example.com/rg-14.tar.gz")` → `"ripgrep_rg-14.tar.gz"`
/// - `job_filename("fd", "https://example.com/")` → `"fd_download.bin"`
pub fn job_filename(name: &str, url: &str) -> String {
    let base = url_basename(url)
        .map(|b| sanitize_filename_for_linux(&b))
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| DEFAULT_BASENAME.to_string());

    let joined = sanitize_filename_for_linux(&format!("{}_{}", name, base));
    if joined.is_empty() || joined == "." || joined == ".." {
        DEFAULT_BASENAME.to_string()
    } else {
        joined
    }
}
