//! GitHub REST client: paginated repository listing and README retrieval.

mod readme;
mod types;

pub use readme::decode_readme;
pub use types::{ReadmePayload, Repository};

use anyhow::{Context, Result};
use std::time::Duration;

use crate::clock::Clock;
use crate::fetch::Fetcher;
use crate::http::Transport;

/// Listing bounds. Accounts with more than `per_page * max_pages` repositories are truncated.
#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub per_page: u32,
    pub max_pages: u32,
    /// Pause between page requests.
    pub delay: Duration,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            per_page: 30,
            max_pages: 2,
            delay: Duration::from_secs(1),
        }
    }
}

pub struct GitHubClient<'f, T, C> {
    fetcher: &'f Fetcher<T, C>,
    api_base: String,
}

impl<'f, T: Transport, C: Clock> GitHubClient<'f, T, C> {
    pub fn new(fetcher: &'f Fetcher<T, C>, api_base: &str) -> Self {
        Self {
            fetcher,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn repos_url(&self, user: &str, per_page: u32, page: u32) -> String {
        format!(
            "{}/users/{}/repos?per_page={}&page={}&sort=updated",
            self.api_base, user, per_page, page
        )
    }

    pub fn readme_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/readme", self.api_base, owner, repo)
    }

    /// Lists `user`'s public repositories, most recently updated first.
    ///
    /// Stops at `max_pages` or at the first short page, whichever comes first.
    pub fn list_repositories(&self, user: &str, paging: &Paging) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        for page in 1..=paging.max_pages {
            let url = self.repos_url(user, paging.per_page, page);
            let resp = self.fetcher.get(&url)?;
            let batch: Vec<Repository> = serde_json::from_slice(&resp.body)
                .with_context(|| format!("decode repository list from {}", url))?;
            let count = batch.len();
            tracing::debug!(page, count, "fetched repository page");
            repos.extend(batch);
            if count < paging.per_page as usize {
                break;
            }
            if page < paging.max_pages {
                self.fetcher.clock().sleep(paging.delay);
            }
        }
        Ok(repos)
    }

    /// Fetches and decodes the README of `owner/repo`. `Ok(None)` when the
    /// repository has none (404) or the payload is not decodable.
    pub fn fetch_readme(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let url = self.readme_url(owner, repo);
        let resp = match self.fetcher.get_optional(&url)? {
            Some(r) => r,
            None => {
                tracing::debug!(repo, "no README");
                return Ok(None);
            }
        };
        let payload: ReadmePayload = serde_json::from_slice(&resp.body)
            .with_context(|| format!("decode README payload from {}", url))?;
        Ok(decode_readme(&payload))
    }
}
