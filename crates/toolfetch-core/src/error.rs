//! Fatal errors: the only failures that abort a whole batch run.

use std::path::PathBuf;
use thiserror::Error;

/// Setup failure that aborts the run before any job is fetched.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot create target directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target directory {path} is not writable: {source}")]
    DirNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open failure log {path} for appending: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
