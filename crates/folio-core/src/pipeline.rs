//! One update run: list repositories, describe them, render the cards into
//! the page, localize external assets and write the page back.
//!
//! The page is read and its container located before any network traffic,
//! so a page without the container fails fast and is never rewritten.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::assets::{AssetLocalizer, AssetReport};
use crate::clock::Clock;
use crate::config::FolioConfig;
use crate::fetch::Fetcher;
use crate::github::{GitHubClient, Paging};
use crate::http::Transport;
use crate::page::{locate_container, splice_container, write_page};
use crate::project::ProjectEntry;
use crate::render::render_cards;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Repositories returned by the listing (before fork filtering).
    pub repositories: usize,
    /// Cards written into the page.
    pub projects: usize,
    pub assets: AssetReport,
    pub page_path: PathBuf,
}

pub struct SiteUpdater<T, C> {
    cfg: FolioConfig,
    fetcher: Fetcher<T, C>,
    localize_assets: bool,
}

impl SiteUpdater<crate::http::CurlTransport, crate::clock::SystemClock> {
    /// Updater with the production fetcher; the token comes from the configured env var.
    pub fn from_config(cfg: FolioConfig) -> Result<Self> {
        let token = cfg.token();
        if token.is_none() {
            tracing::info!("{} not set; using anonymous API requests", cfg.token_env);
        }
        let fetcher = Fetcher::system(cfg.fetch_policy()?).with_api(&cfg.api_base, token);
        Ok(Self::new(cfg, fetcher))
    }
}

impl<T: Transport, C: Clock> SiteUpdater<T, C> {
    pub fn new(cfg: FolioConfig, fetcher: Fetcher<T, C>) -> Self {
        Self {
            cfg,
            fetcher,
            localize_assets: true,
        }
    }

    /// Skip the asset localization stage (cards are still rendered).
    pub fn skip_assets(mut self, skip: bool) -> Self {
        self.localize_assets = !skip;
        self
    }

    fn paging(&self) -> Result<Paging> {
        Ok(Paging {
            per_page: self.cfg.per_page.max(1),
            max_pages: self.cfg.max_pages,
            delay: self.cfg.page_delay()?,
        })
    }

    /// Lists the user's repositories and turns each into a project entry.
    /// Returns the raw listing size alongside the entries.
    pub fn collect_projects(&self) -> Result<(usize, Vec<ProjectEntry>)> {
        let client = GitHubClient::new(&self.fetcher, &self.cfg.api_base);
        let paging = self.paging()?;
        let repos = client
            .list_repositories(&self.cfg.user, &paging)
            .with_context(|| format!("list repositories of {}", self.cfg.user))?;
        let listed = repos.len();
        tracing::info!(user = %self.cfg.user, count = listed, "listed repositories");

        let mut projects = Vec::with_capacity(listed);
        for repo in repos
            .iter()
            .filter(|r| self.cfg.include_forks || !r.fork)
        {
            let readme = client
                .fetch_readme(&self.cfg.user, &repo.name)
                .with_context(|| format!("fetch README of {}", repo.name))?;
            projects.push(ProjectEntry::from_repository(
                repo,
                readme.as_deref(),
                &self.cfg.fallback_description,
            ));
        }
        Ok((listed, projects))
    }

    pub fn run(&self) -> Result<UpdateReport> {
        anyhow::ensure!(
            !self.cfg.user.trim().is_empty(),
            "no user configured: set `user` in the config file or pass --user"
        );
        let page_path = self.cfg.page_path();
        let page = fs::read_to_string(&page_path)
            .with_context(|| format!("read page {}", page_path.display()))?;
        locate_container(&page, &self.cfg.container_id)
            .with_context(|| format!("page {}", page_path.display()))?;

        let (repositories, projects) = self.collect_projects()?;
        let fragment = format!("\n{}\n", render_cards(&projects));
        let mut html = splice_container(&page, &self.cfg.container_id, &fragment)
            .with_context(|| format!("page {}", page_path.display()))?;

        let mut assets = AssetReport::default();
        if self.localize_assets {
            let localizer = AssetLocalizer::new(
                &self.fetcher,
                &self.cfg.site_dir,
                &self.cfg.assets_dir,
                self.cfg.stylesheets,
            );
            let (localized, report) = localizer.localize(&html)?;
            html = localized;
            assets = report;
        }

        write_page(&page_path, &html)?;
        tracing::info!(
            projects = projects.len(),
            localized = assets.localized,
            failed = assets.failed.len(),
            "updated {}",
            page_path.display()
        );

        Ok(UpdateReport {
            repositories,
            projects: projects.len(),
            assets,
            page_path,
        })
    }
}
