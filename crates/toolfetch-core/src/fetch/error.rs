//! Fetch error type, classified for retry and mapped to a job failure reason.

use crate::outcome::FailureReason;
use thiserror::Error;

/// Error from a single fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, malformed URL, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Transfer ended with fewer bytes than the server announced.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Creating, writing, syncing or renaming the local file failed. Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
}

impl From<FetchError> for FailureReason {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Curl(ce) if ce.is_operation_timedout() => FailureReason::Timeout {
                message: ce.to_string(),
            },
            FetchError::Curl(ce) => FailureReason::Network {
                message: ce.to_string(),
            },
            FetchError::Http(code) => FailureReason::HttpStatus { code },
            e @ FetchError::PartialTransfer { .. } => FailureReason::Network {
                message: e.to_string(),
            },
            FetchError::Storage(io) => FailureReason::FilesystemWrite {
                message: io.to_string(),
            },
        }
    }
}
