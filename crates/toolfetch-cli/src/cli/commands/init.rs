//! `toolfetch init` – write a default config file.

use anyhow::Result;
use std::path::PathBuf;
use toolfetch_core::config;

pub fn run_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => config::config_path()?,
    };
    config::write_default(&path, force)?;
    println!("Wrote default config to {}", path.display());
    println!("Add tools under [tools] as name = \"https://...\" and run `toolfetch run`.");
    Ok(())
}
