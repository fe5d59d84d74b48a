//! `toolfetch run` – fetch every job, log failures, print a summary.

use anyhow::{Context, Result};
use std::path::PathBuf;
use toolfetch_core::batch::BatchEvent;
use toolfetch_core::config::{CollisionPolicy, ToolfetchConfig};
use toolfetch_core::failure_log::FileFailureLog;
use toolfetch_core::outcome::Outcome;

use super::jobs;

/// Command-line overrides for one run.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub tools: Vec<String>,
    pub dest: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub collision: Option<CollisionPolicy>,
    pub json: bool,
}

/// Console line for one progress event.
pub(crate) fn event_line(event: &BatchEvent, total: usize) -> String {
    match event {
        BatchEvent::Started {
            index, name, url, ..
        } => format!("[{}/{}] fetching {} <- {}", index + 1, total, name, url),
        BatchEvent::Finished {
            index,
            name,
            outcome,
        } => match outcome {
            Outcome::Success { path, bytes } => format!(
                "[{}/{}] {}: ok ({} bytes -> {})",
                index + 1,
                total,
                name,
                bytes,
                path.display()
            ),
            Outcome::Failure { reason } => {
                format!("[{}/{}] {}: FAILED ({})", index + 1, total, name, reason)
            }
        },
    }
}

pub async fn run_batch(cfg: &ToolfetchConfig, opts: RunOptions) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let set = jobs::job_set(cfg, &opts.tools)?;
    let fetcher = jobs::fetcher(cfg, &cwd, opts.dest, opts.jobs, opts.collision);

    let log_path = match opts.log {
        Some(p) if p.is_absolute() => p,
        Some(p) => cwd.join(p),
        None => cfg.resolved_failure_log(&cwd),
    };
    let mut failure_log = FileFailureLog::open(&log_path)?;

    let total = set.len();
    let to_stderr = opts.json;
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<BatchEvent>(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let line = event_line(&event, total);
            if to_stderr {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    });

    let result = fetcher.run(&set, &mut failure_log, Some(event_tx)).await;
    let _ = printer.await;
    let report = result?;

    if opts.json {
        let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
        println!("{}", json);
    } else {
        println!("{}", report.summary_line());
        if report.failure_count() > 0 {
            println!("failures appended to {}", failure_log.path().display());
        }
    }
    Ok(())
}
