//! Run report: every job paired with its outcome, in job input order.

use serde::Serialize;
use std::time::Duration;

use crate::job::Job;
use crate::outcome::{FailureReason, Outcome};

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub job: Job,
    pub outcome: Outcome,
}

/// Outcomes of one batch invocation. Entries follow the job set's order,
/// not completion order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub entries: Vec<ReportEntry>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// Failed jobs with their reasons, in report order.
    pub fn failures(&self) -> impl Iterator<Item = (&Job, &FailureReason)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.failure_reason().map(|r| (&e.job, r)))
    }

    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.job.name() == name)
            .map(|e| &e.outcome)
    }

    /// One-line summary, e.g. `batch complete: 3 jobs, 2 succeeded, 1 failed in 1.2s`.
    pub fn summary_line(&self) -> String {
        format!(
            "batch complete: {} jobs, {} succeeded, {} failed in {:.1}s",
            self.len(),
            self.success_count(),
            self.failure_count(),
            self.elapsed.as_secs_f64()
        )
    }
}
