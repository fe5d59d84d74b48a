//! Download jobs and the validated, ordered set of jobs for one batch.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// One named unit of work: a tool name and the URL of its release archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    name: String,
    url: String,
}

impl Job {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobSetError {
    #[error("no jobs configured")]
    Empty,
    #[error("job name must not be empty (url: {url})")]
    EmptyName { url: String },
    #[error("job {name:?} has an empty URL")]
    EmptyUrl { name: String },
    #[error("duplicate job name {name:?}")]
    DuplicateName { name: String },
    #[error("invalid job spec {spec:?}: expected NAME=URL")]
    BadSpec { spec: String },
}

/// Non-empty batch of jobs with unique names, in a fixed iteration order.
#[derive(Debug, Clone)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    /// Build from an explicit ordered list. Rejects empty input, blank names/URLs and duplicates.
    pub fn new(jobs: Vec<Job>) -> Result<Self, JobSetError> {
        if jobs.is_empty() {
            return Err(JobSetError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::with_capacity(jobs.len());
        for job in jobs {
            let name = job.name.trim().to_string();
            let url = job.url.trim().to_string();
            if name.is_empty() {
                return Err(JobSetError::EmptyName { url });
            }
            if url.is_empty() {
                return Err(JobSetError::EmptyUrl { name });
            }
            if !seen.insert(name.clone()) {
                return Err(JobSetError::DuplicateName { name });
            }
            out.push(Job { name, url });
        }
        Ok(Self { jobs: out })
    }

    /// Build from a name -> URL table; jobs are ordered by name.
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self, JobSetError> {
        Self::new(
            table
                .iter()
                .map(|(name, url)| Job::new(name.clone(), url.clone()))
                .collect(),
        )
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Always false for a constructed set; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }
}

impl<'a> IntoIterator for &'a JobSet {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

/// Parse a command-line job spec of the form `NAME=URL`.
pub fn parse_job_spec(spec: &str) -> Result<(String, String), JobSetError> {
    let (name, url) = spec.split_once('=').ok_or_else(|| JobSetError::BadSpec {
        spec: spec.to_string(),
    })?;
    let (name, url) = (name.trim(), url.trim());
    if name.is_empty() || url.is_empty() {
        return Err(JobSetError::BadSpec {
            spec: spec.to_string(),
        });
    }
    Ok((name.to_string(), url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_rejected() {
        assert_eq!(JobSet::new(vec![]).unwrap_err(), JobSetError::Empty);
        assert_eq!(
            JobSet::from_table(&BTreeMap::new()).unwrap_err(),
            JobSetError::Empty
        );
    }

    #[test]
    fn duplicate_names_rejected_after_trim() {
        let err = JobSet::new(vec![
            Job::new("fd", "https://example.com/a"),
            Job::new(" fd ", "https://example.com/b"),
        ])
        .unwrap_err();
        assert_eq!(err, JobSetError::DuplicateName { name: "fd".into() });
    }

    #[test]
    fn blank_name_or_url_rejected() {
        assert!(matches!(
            JobSet::new(vec![Job::new("  ", "https://example.com/a")]),
            Err(JobSetError::EmptyName { .. })
        ));
        assert!(matches!(
            JobSet::new(vec![Job::new("x", "")]),
            Err(JobSetError::EmptyUrl { .. })
        ));
    }

    #[test]
    fn table_order_is_by_name() {
        let mut table = BTreeMap::new();
        table.insert("zoxide".to_string(), "https://example.com/z".to_string());
        table.insert("bat".to_string(), "https://example.com/b".to_string());
        table.insert("fd".to_string(), "https://example.com/f".to_string());
        let set = JobSet::from_table(&table).unwrap();
        let names: Vec<_> = set.iter().map(|j| j.name()).collect();
        assert_eq!(names, vec!["bat", "fd", "zoxide"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn parse_spec() {
        assert_eq!(
            parse_job_spec("rg=https://example.com/rg.tgz?x=1").unwrap(),
            ("rg".to_string(), "https://example.com/rg.tgz?x=1".to_string())
        );
        assert!(parse_job_spec("no-equals").is_err());
        assert!(parse_job_spec("=https://example.com").is_err());
        assert!(parse_job_spec("name=").is_err());
    }
}
