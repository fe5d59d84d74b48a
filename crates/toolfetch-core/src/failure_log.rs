//! Failure log: an injected, append-only sink for failed jobs.
//!
//! The batch owns no global log state; callers pass a `FailureSink`. The file
//! sink writes one tab-separated line per failure:
//! `<RFC 3339 UTC timestamp>\t<job name>\t<url>\t<reason>`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::SetupError;
use crate::job::Job;
use crate::outcome::FailureReason;

/// Destination for failed-job records.
pub trait FailureSink {
    fn record(&mut self, job: &Job, reason: &FailureReason) -> io::Result<()>;
}

/// Appends failure records to a file. Opened once, before the run.
#[derive(Debug)]
pub struct FileFailureLog {
    file: File,
    path: PathBuf,
}

impl FileFailureLog {
    /// Open (creating if needed) `path` for appending. Failing here is fatal to the run.
    pub fn open(path: &Path) -> Result<Self, SetupError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SetupError::OpenLog {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Formats one log line (without trailing newline). Tabs and newlines inside
/// fields are replaced with spaces so every record stays on one line.
pub fn format_record(timestamp: &str, job: &Job, reason: &FailureReason) -> String {
    let clean = |s: &str| s.replace(['\t', '\n', '\r'], " ");
    format!(
        "{}\t{}\t{}\t{}",
        timestamp,
        clean(job.name()),
        clean(job.url()),
        clean(&reason.to_string())
    )
}

impl FailureSink for FileFailureLog {
    fn record(&mut self, job: &Job, reason: &FailureReason) -> io::Result<()> {
        let ts = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let line = format_record(&ts, job, reason);
        // Single write per record.
        self.file.write_all(format!("{}\n", line).as_bytes())?;
        self.file.flush()
    }
}

/// In-memory sink, for tests and for callers that only want the report.
#[derive(Debug, Default, Clone)]
pub struct MemoryFailureLog {
    pub entries: Vec<(Job, FailureReason)>,
}

impl FailureSink for MemoryFailureLog {
    fn record(&mut self, job: &Job, reason: &FailureReason) -> io::Result<()> {
        self.entries.push((job.clone(), reason.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_format_is_single_line() {
        let job = Job::new("bad\tname", "https://example.com/x");
        let line = format_record(
            "2024-01-01T00:00:00Z",
            &job,
            &FailureReason::Network {
                message: "reset\nby peer".into(),
            },
        );
        assert_eq!(
            line,
            "2024-01-01T00:00:00Z\tbad name\thttps://example.com/x\tnetwork error: reset by peer"
        );
    }

    #[test]
    fn file_log_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_errors.log");
        let job = Job::new("a", "https://example.com/404");
        {
            let mut log = FileFailureLog::open(&path).unwrap();
            log.record(&job, &FailureReason::HttpStatus { code: 404 }).unwrap();
        }
        {
            let mut log = FileFailureLog::open(&path).unwrap();
            log.record(&job, &FailureReason::HttpStatus { code: 500 }).unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\ta\thttps://example.com/404\tHTTP status 404"));
        assert!(lines[1].ends_with("HTTP status 500"));
    }

    #[test]
    fn open_in_missing_dir_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("errors.log");
        assert!(matches!(
            FileFailureLog::open(&path),
            Err(SetupError::OpenLog { .. })
        ));
    }
}
