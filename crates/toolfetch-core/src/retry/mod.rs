//! Retry and backoff policy.
//!
//! Classifies fetch errors (timeouts, throttling, connection failures) and
//! makes exponential backoff decisions, so the batch can retry transient
//! failures of a job before recording its outcome.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
