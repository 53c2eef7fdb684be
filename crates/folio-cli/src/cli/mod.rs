//! CLI for the folio portfolio updater.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use folio_core::config::{self, FolioConfig};
use std::path::PathBuf;

use commands::{
    run_completions, run_config, run_describe, run_man, run_publish, run_update, UpdateArgs,
};

/// Top-level CLI for the folio portfolio updater.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "folio: refresh a portfolio page from a user's public repositories", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/folio/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch repositories, render project cards into the page and localize assets.
    Update {
        /// Account whose repositories are listed (overrides config).
        #[arg(long)]
        user: Option<String>,
        /// Site directory holding the page (overrides config).
        #[arg(long, value_name = "DIR")]
        site_dir: Option<PathBuf>,
        /// Commit and push the site after a successful update.
        #[arg(long)]
        publish: bool,
        /// Leave external assets pointing at their remote URLs.
        #[arg(long)]
        skip_assets: bool,
    },

    /// Commit and push the site directory without updating it.
    Publish {
        /// Site directory (overrides config).
        #[arg(long, value_name = "DIR")]
        site_dir: Option<PathBuf>,
    },

    /// Print the description that would be extracted from a README file.
    Describe {
        /// Path to a README (markdown).
        path: PathBuf,
    },

    /// Show the config file path and effective settings.
    Config,

    /// Generate shell completions on stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Render the man page on stdout.
    Man,
}

fn load_config(path: Option<&PathBuf>) -> Result<FolioConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Update {
                user,
                site_dir,
                publish,
                skip_assets,
            } => run_update(
                cfg,
                UpdateArgs {
                    user,
                    site_dir,
                    publish,
                    skip_assets,
                },
            )?,
            CliCommand::Publish { site_dir } => run_publish(&cfg, site_dir)?,
            CliCommand::Describe { path } => run_describe(&cfg, &path)?,
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
