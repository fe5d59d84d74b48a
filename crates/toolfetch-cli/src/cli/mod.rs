//! CLI for toolfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toolfetch_core::config::{self, CollisionPolicy, ToolfetchConfig};

use commands::{run_batch, run_completions, run_init, run_plan, RunOptions};

/// Top-level CLI for toolfetch.
#[derive(Debug, Parser)]
#[command(name = "toolfetch")]
#[command(about = "Download a table of tool release archives into a local directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where the job table comes from and where its files go.
#[derive(Debug, Args)]
pub struct JobSource {
    /// Config file (default: ~/.config/toolfetch/tools.toml, created if missing).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Add a job as NAME=URL (repeatable). Overrides a configured tool of the same name.
    #[arg(long = "tool", visible_alias = "job", value_name = "NAME=URL")]
    pub tools: Vec<String>,

    /// Target directory (overrides `dest_dir` from the config).
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    Rename,
    Fail,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(c: CollisionArg) -> Self {
        match c {
            CollisionArg::Rename => CollisionPolicy::Rename,
            CollisionArg::Fail => CollisionPolicy::Fail,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every configured tool archive.
    Run {
        #[command(flatten)]
        source: JobSource,

        /// Failure log to append to (overrides `failure_log` from the config).
        #[arg(long, value_name = "FILE")]
        log: Option<PathBuf>,

        /// Fetch up to N jobs concurrently (1 = one at a time).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// What to do when two jobs derive the same filename.
        #[arg(long, value_enum)]
        collision: Option<CollisionArg>,

        /// Print the run report as JSON on stdout (progress goes to stderr).
        #[arg(long)]
        json: bool,
    },

    /// Show jobs and their resolved destinations without downloading.
    Plan {
        #[command(flatten)]
        source: JobSource,

        #[arg(long, value_enum)]
        collision: Option<CollisionArg>,
    },

    /// Write a default config file.
    Init {
        /// Where to write it (default: ~/.config/toolfetch/tools.toml).
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn load_config(source: &JobSource) -> Result<ToolfetchConfig> {
    let cfg = config::load_or_init(source.config.as_deref())?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                source,
                log,
                jobs,
                collision,
                json,
            } => {
                let cfg = load_config(&source)?;
                let opts = RunOptions {
                    tools: source.tools,
                    dest: source.dest,
                    log,
                    jobs,
                    collision: collision.map(Into::into),
                    json,
                };
                run_batch(&cfg, opts).await?;
            }
            CliCommand::Plan { source, collision } => {
                let cfg = load_config(&source)?;
                run_plan(&cfg, &source.tools, source.dest, collision.map(Into::into))?;
            }
            CliCommand::Init { config, force } => run_init(config, force)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
