//! Single-stream HTTP GET of one job into its destination file.
//!
//! Uses a libcurl easy handle. The body is streamed into a hidden temp file
//! next to the destination and renamed over it only after a complete 2xx
//! transfer.

mod error;

pub use error::FetchError;

use crate::retry::{run_with_retry, RetryPolicy};
use crate::storage::TempFile;
use std::path::Path;
use std::time::Duration;

/// Transfer limits and request settings for one fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound for the whole transfer.
    pub timeout: Duration,
    /// Abort when slower than `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
            user_agent: concat!("toolfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// One GET attempt. Returns the number of bytes now at `dest`.
///
/// Blocks the current thread; call from `spawn_blocking` in async code.
pub fn fetch_once(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let mut temp = TempFile::create(dest).map_err(FetchError::Storage)?;
    let mut write_err: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match temp.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_err = Some(e);
                Ok(0) // short count aborts the transfer
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        return Err(match write_err {
            Some(io) => FetchError::Storage(io),
            None => FetchError::Curl(e),
        });
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    let announced = easy.content_length_download()?;
    if announced >= 0.0 && announced as u64 != temp.written() {
        return Err(FetchError::PartialTransfer {
            expected: announced as u64,
            received: temp.written(),
        });
    }

    temp.finalize().map_err(FetchError::Storage)
}

/// Fetches `url` into `dest`, retrying transient failures per `policy`.
pub fn fetch_to_path(
    url: &str,
    dest: &Path,
    opts: &FetchOptions,
    policy: &RetryPolicy,
    label: &str,
) -> Result<u64, FetchError> {
    run_with_retry(policy, label, || fetch_once(url, dest, opts))
}
