//! CLI command handlers. Each command is in its own file.

mod completions;
mod init;
mod jobs;
mod plan;
mod run;

pub use completions::run_completions;
pub use init::run_init;
pub use plan::run_plan;
pub use run::{run_batch, RunOptions};
