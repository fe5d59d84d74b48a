//! Job table assembly shared by `run` and `plan`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use toolfetch_core::batch::BatchFetcher;
use toolfetch_core::config::{CollisionPolicy, ToolfetchConfig};
use toolfetch_core::job::{parse_job_spec, JobSet};

/// Config `[tools]` table merged with `--tool NAME=URL` entries, ordered by name.
pub(super) fn job_set(cfg: &ToolfetchConfig, extra: &[String]) -> Result<JobSet> {
    let mut table = cfg.tools.clone();
    for spec in extra {
        let (name, url) = parse_job_spec(spec)?;
        if table.insert(name.clone(), url).is_some() {
            tracing::debug!(job = %name, "--tool overrides configured URL");
        }
    }
    JobSet::from_table(&table)
        .context("add tools under [tools] in the config file or pass --tool NAME=URL")
}

pub(super) fn fetcher(
    cfg: &ToolfetchConfig,
    cwd: &Path,
    dest: Option<PathBuf>,
    jobs: Option<usize>,
    collision: Option<CollisionPolicy>,
) -> BatchFetcher {
    let mut f = BatchFetcher::from_config(cfg, cwd);
    if let Some(dir) = dest {
        f = f.with_dest_dir(if dir.is_absolute() { dir } else { cwd.join(dir) });
    }
    if let Some(n) = jobs {
        f = f.with_concurrency(n);
    }
    if let Some(policy) = collision {
        f = f.with_collision_policy(policy);
    }
    f
}
