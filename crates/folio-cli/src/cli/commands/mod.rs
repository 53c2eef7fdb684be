//! CLI command handlers, one file per command.

mod completions;
mod config;
mod describe;
mod publish;
mod update;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use describe::run_describe;
pub use publish::run_publish;
pub use update::{run_update, UpdateArgs};
