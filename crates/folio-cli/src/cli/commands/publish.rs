//! `folio publish` – commit and push the site directory.

use anyhow::Result;
use folio_core::config::{FolioConfig, PublishConfig};
use folio_core::publish::{publish, PublishOutcome, SystemGit};
use std::path::{Path, PathBuf};

pub fn run_publish(cfg: &FolioConfig, site_dir: Option<PathBuf>) -> Result<()> {
    let dir = site_dir.unwrap_or_else(|| cfg.site_dir.clone());
    publish_site(&dir, &cfg.publish_settings())
}

/// Runs the git steps. The error stays a `PublishError` so the exit code can tell it apart.
pub(super) fn publish_site(dir: &Path, settings: &PublishConfig) -> Result<()> {
    match publish(&SystemGit, dir, settings)? {
        PublishOutcome::Pushed => println!(
            "Pushed {} to {}",
            dir.display(),
            settings.remote
        ),
        PublishOutcome::NothingToCommit => println!("Nothing to publish in {}", dir.display()),
    }
    Ok(())
}
