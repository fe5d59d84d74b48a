//! Terminal result of one job.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a job failed. Every variant is local to its job and never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Connection, DNS, TLS or protocol failure (including a truncated body).
    #[error("network error: {message}")]
    Network { message: String },
    /// Server answered with a non-2xx status.
    #[error("HTTP status {code}")]
    HttpStatus { code: u32 },
    #[error("timed out: {message}")]
    Timeout { message: String },
    /// Creating, writing or renaming the local file failed.
    #[error("filesystem write error: {message}")]
    FilesystemWrite { message: String },
    /// Destination filename already belongs to another job.
    #[error("destination name collides with job {with:?}")]
    NameCollision { with: String },
    /// Worker task panicked or was cancelled.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl FailureReason {
    /// Short stable label, used in the failure log and console output.
    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::Network { .. } => "network",
            FailureReason::HttpStatus { .. } => "http_status",
            FailureReason::Timeout { .. } => "timeout",
            FailureReason::FilesystemWrite { .. } => "filesystem_write",
            FailureReason::NameCollision { .. } => "name_collision",
            FailureReason::Internal { .. } => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { path: PathBuf, bytes: u64 },
    Failure { reason: FailureReason },
}

impl Outcome {
    pub fn failure(reason: FailureReason) -> Self {
        Outcome::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success { path, bytes } => {
                write!(f, "ok ({} bytes -> {})", bytes, path.display())
            }
            Outcome::Failure { reason } => write!(f, "FAILED: {}", reason),
        }
    }
}
