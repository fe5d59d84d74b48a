//! Destination planning: one output path per job, with collisions resolved
//! up front so no job can overwrite another job's file mid-run.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::CollisionPolicy;
use crate::job::JobSet;
use crate::url_model::{job_filename, truncate_on_char_boundary, NAME_MAX};

/// Extensions kept together when a numeric suffix is inserted.
const COMPOUND_EXTENSIONS: &[&str] = &[".tar.gz", ".tar.xz", ".tar.bz2", ".tar.zst"];

/// Where a job's content goes, or why it has nowhere to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Path(PathBuf),
    /// Derived filename already claimed by the named earlier job (collision policy `fail`).
    Collision { with: String },
}

impl Destination {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::Path(p) => Some(p),
            Destination::Collision { .. } => None,
        }
    }
}

/// Inserts `-{n}` before the extension: `tool_x.tar.gz` → `tool_x-2.tar.gz`.
///
/// The stem is shortened (on a char boundary) so the result stays within
/// `NAME_MAX` bytes. An extension too long to keep is treated as part of the stem.
pub fn with_numeric_suffix(filename: &str, n: u32) -> String {
    let suffix = format!("-{}", n);
    let split = COMPOUND_EXTENSIONS
        .iter()
        .find(|ext| filename.len() > ext.len() && filename.ends_with(*ext))
        .map(|ext| filename.len() - ext.len())
        .or_else(|| filename.rfind('.').filter(|&i| i > 0))
        .filter(|&i| filename.len() - i + suffix.len() < NAME_MAX);
    let (stem, ext) = match split {
        Some(i) => filename.split_at(i),
        None => (filename, ""),
    };
    let stem = truncate_on_char_boundary(stem, NAME_MAX - suffix.len() - ext.len());
    format!("{}{}{}", stem, suffix, ext)
}

/// Plans one destination per job, in job order.
///
/// The first job (in input order) to derive a filename keeps it. With
/// `CollisionPolicy::Rename`, later jobs get the smallest suffix `-2`, `-3`, ...
/// that is neither taken nor the natural filename of any job in the set. With
/// `CollisionPolicy::Fail`, later jobs get `Destination::Collision`.
pub fn plan_destinations(jobs: &JobSet, dir: &Path, policy: CollisionPolicy) -> Vec<Destination> {
    let natural: Vec<String> = jobs
        .iter()
        .map(|j| job_filename(j.name(), j.url()))
        .collect();
    let reserved: HashSet<&str> = natural.iter().map(String::as_str).collect();
    let mut owner: HashMap<String, &str> = HashMap::with_capacity(natural.len());

    jobs.iter()
        .zip(natural.iter())
        .map(|(job, name)| {
            if !owner.contains_key(name) {
                owner.insert(name.clone(), job.name());
                return Destination::Path(dir.join(name));
            }
            match policy {
                CollisionPolicy::Fail => Destination::Collision {
                    with: owner[name].to_string(),
                },
                CollisionPolicy::Rename => {
                    let mut n = 2u32;
                    let renamed = loop {
                        let candidate = with_numeric_suffix(name, n);
                        if !owner.contains_key(&candidate) && !reserved.contains(candidate.as_str()) {
                            break candidate;
                        }
                        n += 1;
                    };
                    tracing::debug!(
                        job = job.name(),
                        from = %name,
                        to = %renamed,
                        "destination collision resolved by renaming"
                    );
                    owner.insert(renamed.clone(), job.name());
                    Destination::Path(dir.join(renamed))
                }
            }
        })
        .collect()
}
