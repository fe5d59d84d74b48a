//! Batch fetcher: runs every job of a `JobSet` with bounded concurrency.
//!
//! Setup (target directory creation and a writability check) is the only
//! fatal phase. After it, each job is fetched independently on the blocking
//! pool, at most `concurrency` at once; its error is converted to a recorded
//! `Outcome` at the job boundary. Failures are appended to the injected
//! `FailureSink` by this task alone, in job order, once every job resolved.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::{CollisionPolicy, ToolfetchConfig};
use crate::destination::{plan_destinations, Destination};
use crate::error::SetupError;
use crate::failure_log::FailureSink;
use crate::fetch::{fetch_to_path, FetchOptions};
use crate::job::JobSet;
use crate::outcome::{FailureReason, Outcome};
use crate::report::{ReportEntry, RunReport};
use crate::retry::RetryPolicy;

/// Progress notification for one job. `index` is the job's position in the set.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        index: usize,
        name: String,
        url: String,
        dest: Option<PathBuf>,
    },
    Finished {
        index: usize,
        name: String,
        outcome: Outcome,
    },
}

/// Create `dir` if needed and check that files can be created in it.
pub fn prepare_target_dir(dir: &Path) -> Result<(), SetupError> {
    std::fs::create_dir_all(dir).map_err(|source| SetupError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    // Removed again when dropped.
    tempfile::Builder::new()
        .prefix(".toolfetch-check")
        .tempfile_in(dir)
        .map_err(|source| SetupError::DirNotWritable {
            path: dir.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct BatchFetcher {
    dest_dir: PathBuf,
    concurrency: usize,
    collision: CollisionPolicy,
    fetch: FetchOptions,
    retry: RetryPolicy,
}

impl BatchFetcher {
    /// Fetcher writing into `dest_dir` with default limits (4 concurrent jobs,
    /// rename on collision, default timeouts and retry policy).
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            concurrency: 4,
            collision: CollisionPolicy::default(),
            fetch: FetchOptions::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Fetcher configured from `cfg`, with relative paths resolved against `cwd`.
    pub fn from_config(cfg: &ToolfetchConfig, cwd: &Path) -> Self {
        Self::new(cfg.resolved_dest_dir(cwd))
            .with_concurrency(cfg.concurrency)
            .with_collision_policy(cfg.collision)
            .with_fetch_options(cfg.fetch_options())
            .with_retry_policy(cfg.retry_policy())
    }

    pub fn with_dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = dir.into();
        self
    }

    /// At least one job is always in flight; 1 means strictly sequential.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    pub fn with_fetch_options(mut self, opts: FetchOptions) -> Self {
        self.fetch = opts;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Destinations this fetcher would use for `jobs`, in job order.
    pub fn plan(&self, jobs: &JobSet) -> Vec<Destination> {
        plan_destinations(jobs, &self.dest_dir, self.collision)
    }

    /// Runs the batch. Returns `Err` only for setup failures, in which case no
    /// job was attempted and nothing was recorded in `sink`.
    pub async fn run<S>(
        &self,
        jobs: &JobSet,
        sink: &mut S,
        events: Option<mpsc::Sender<BatchEvent>>,
    ) -> Result<RunReport, SetupError>
    where
        S: FailureSink + ?Sized,
    {
        let started = Instant::now();
        prepare_target_dir(&self.dest_dir)?;
        tracing::debug!(
            dir = %self.dest_dir.display(),
            jobs = jobs.len(),
            concurrency = self.concurrency,
            "starting batch"
        );

        let destinations = self.plan(jobs);
        let mut outcomes: Vec<Option<Outcome>> = vec![None; jobs.len()];
        let mut pending = destinations.into_iter().enumerate();
        let mut join_set: JoinSet<(usize, Outcome)> = JoinSet::new();

        loop {
            while join_set.len() < self.concurrency {
                let Some((index, destination)) = pending.next() else {
                    break;
                };
                let job = &jobs.jobs()[index];
                emit(
                    &events,
                    BatchEvent::Started {
                        index,
                        name: job.name().to_string(),
                        url: job.url().to_string(),
                        dest: destination.path().map(Path::to_path_buf),
                    },
                )
                .await;

                let dest = match destination {
                    Destination::Path(p) => p,
                    Destination::Collision { with } => {
                        let outcome = Outcome::failure(FailureReason::NameCollision { with });
                        resolve(jobs, index, outcome, &mut outcomes, &events).await;
                        continue;
                    }
                };

                let url = job.url().to_string();
                let name = job.name().to_string();
                let opts = self.fetch.clone();
                let policy = self.retry;
                join_set.spawn_blocking(move || {
                    let res = catch_unwind(AssertUnwindSafe(|| {
                        fetch_to_path(&url, &dest, &opts, &policy, &name)
                    }));
                    let outcome = match res {
                        Ok(Ok(bytes)) => Outcome::Success { path: dest, bytes },
                        Ok(Err(e)) => Outcome::failure(e.into()),
                        Err(_) => Outcome::failure(FailureReason::Internal {
                            message: "fetch worker panicked".to_string(),
                        }),
                    };
                    (index, outcome)
                });
            }

            let Some(res) = join_set.join_next().await else {
                break;
            };
            match res {
                Ok((index, outcome)) => resolve(jobs, index, outcome, &mut outcomes, &events).await,
                Err(e) => tracing::error!("fetch task join: {}", e),
            }
        }

        resolve_lost(jobs, &mut outcomes, &events).await;

        let mut entries = Vec::with_capacity(jobs.len());
        for (job, outcome) in jobs.iter().zip(outcomes.into_iter().flatten()) {
            if let Some(reason) = outcome.failure_reason() {
                if let Err(e) = sink.record(job, reason) {
                    tracing::error!(job = job.name(), "could not append to failure log: {}", e);
                }
            }
            entries.push(ReportEntry {
                job: job.clone(),
                outcome,
            });
        }

        let report = RunReport {
            entries,
            elapsed: started.elapsed(),
        };
        tracing::info!("{}", report.summary_line());
        Ok(report)
    }
}

/// Logs `outcome`, reports it as `Finished` and stores it in the job's slot.
async fn resolve(
    jobs: &JobSet,
    index: usize,
    outcome: Outcome,
    outcomes: &mut [Option<Outcome>],
    events: &Option<mpsc::Sender<BatchEvent>>,
) {
    let job = &jobs.jobs()[index];
    match &outcome {
        Outcome::Success { path, bytes } => {
            tracing::info!(job = job.name(), bytes, path = %path.display(), "job succeeded")
        }
        Outcome::Failure { reason } => {
            tracing::info!(job = job.name(), kind = reason.label(), "job failed: {}", reason)
        }
    }
    emit(
        events,
        BatchEvent::Finished {
            index,
            name: job.name().to_string(),
            outcome: outcome.clone(),
        },
    )
    .await;
    debug_assert!(outcomes[index].is_none(), "job resolved twice");
    outcomes[index] = Some(outcome);
}

/// Gives every job whose task never reported back an `Internal` outcome.
async fn resolve_lost(
    jobs: &JobSet,
    outcomes: &mut [Option<Outcome>],
    events: &Option<mpsc::Sender<BatchEvent>>,
) {
    for index in 0..outcomes.len() {
        if outcomes[index].is_none() {
            let outcome = Outcome::failure(FailureReason::Internal {
                message: "fetch task lost".to_string(),
            });
            resolve(jobs, index, outcome, outcomes, events).await;
        }
    }
}

async fn emit(events: &Option<mpsc::Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is watching progress.
        let _ = tx.send(event).await;
    }
}
