//! `toolfetch plan` – show jobs and destinations without touching the network.

use anyhow::Result;
use std::path::PathBuf;
use toolfetch_core::config::{CollisionPolicy, ToolfetchConfig};
use toolfetch_core::destination::Destination;

use super::jobs;

pub fn run_plan(
    cfg: &ToolfetchConfig,
    tools: &[String],
    dest: Option<PathBuf>,
    collision: Option<CollisionPolicy>,
) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let set = jobs::job_set(cfg, tools)?;
    let fetcher = jobs::fetcher(cfg, &cwd, dest, None, collision);

    println!("target: {}", fetcher.dest_dir().display());
    println!("{:<20} {:<40} {}", "NAME", "DESTINATION", "URL");
    for (job, destination) in set.iter().zip(fetcher.plan(&set)) {
        let shown = match destination {
            Destination::Path(p) => p
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Destination::Collision { with } => format!("(collides with {})", with),
        };
        println!("{:<20} {:<40} {}", job.name(), shown, job.url());
    }
    Ok(())
}
