//! `folio update` – refresh the project list in the page, optionally publish.

use anyhow::Result;
use folio_core::config::FolioConfig;
use folio_core::pipeline::{SiteUpdater, UpdateReport};
use std::path::PathBuf;

use super::publish::publish_site;

/// Command-line overrides for an update run.
#[derive(Debug, Default)]
pub struct UpdateArgs {
    pub user: Option<String>,
    pub site_dir: Option<PathBuf>,
    pub publish: bool,
    pub skip_assets: bool,
}

pub fn run_update(mut cfg: FolioConfig, args: UpdateArgs) -> Result<()> {
    if let Some(user) = args.user {
        cfg.user = user;
    }
    if let Some(dir) = args.site_dir {
        cfg.site_dir = dir;
    }
    let publish = cfg.publish_settings();
    let site_dir = cfg.site_dir.clone();

    let report = SiteUpdater::from_config(cfg)?
        .skip_assets(args.skip_assets)
        .run()?;
    print_report(&report);

    if args.publish {
        publish_site(&site_dir, &publish)?;
    }
    Ok(())
}

fn print_report(report: &UpdateReport) {
    println!("Updated {}", report.page_path.display());
    println!(
        "  repositories: {}  projects: {}",
        report.repositories, report.projects
    );
    println!(
        "  assets localized: {}  stylesheets inlined: {}  failed: {}",
        report.assets.localized,
        report.assets.inlined,
        report.assets.failed.len()
    );
    for url in &report.assets.failed {
        println!("    kept remote: {}", url);
    }
}
