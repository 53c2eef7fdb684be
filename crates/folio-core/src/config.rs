use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::FetchPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between failed attempts.
    pub retry_delay_secs: f64,
    /// Longest rate-limit wait we accept before giving up (None = wait as long as the API says).
    #[serde(default)]
    pub max_rate_limit_wait_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 1.0,
            max_rate_limit_wait_secs: None,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<FetchPolicy> {
        Ok(FetchPolicy {
            max_attempts: self.max_attempts.max(1),
            retry_delay: seconds("retry.retry_delay_secs", self.retry_delay_secs)?,
            max_rate_limit_wait: self.max_rate_limit_wait_secs.map(Duration::from_secs),
            ..FetchPolicy::default()
        })
    }
}

/// Negative values clamp to zero; infinite or out-of-range values are rejected.
fn seconds(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs.max(0.0))
        .map_err(|_| anyhow::anyhow!("config: {} = {} is not a usable duration", field, secs))
}

/// Git publish parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Remote to push to.
    pub remote: String,
    /// Branch to push; None pushes the current branch to its upstream.
    #[serde(default)]
    pub branch: Option<String>,
    /// Commit message.
    pub message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: None,
            message: "Update portfolio projects".to_string(),
        }
    }
}

/// How external stylesheets are handled: inlined into `<style>` or saved under the assets dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylesheetMode {
    #[default]
    Inline,
    Localize,
}

/// Global configuration loaded from `~/.config/folio/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Account whose public repositories are listed. Empty until configured.
    pub user: String,
    /// Site working copy holding the page (and the git checkout for publishing).
    pub site_dir: PathBuf,
    /// Page file, relative to `site_dir`.
    pub page_file: String,
    /// Assets directory, relative to `site_dir`.
    pub assets_dir: String,
    /// `id` of the container element whose content is replaced.
    pub container_id: String,
    /// REST API root.
    pub api_base: String,
    /// Environment variable that holds the API token.
    pub token_env: String,
    /// Repositories per listing page.
    pub per_page: u32,
    /// Upper bound on listing pages fetched.
    pub max_pages: u32,
    /// Pause between listing pages, in seconds.
    pub page_delay_secs: f64,
    /// Description used when a repository has no usable README.
    pub fallback_description: String,
    /// List forked repositories too.
    #[serde(default = "default_true")]
    pub include_forks: bool,
    #[serde(default)]
    pub stylesheets: StylesheetMode,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub publish: Option<PublishConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            site_dir: PathBuf::from("."),
            page_file: "index.html".to_string(),
            assets_dir: "assets".to_string(),
            container_id: "lista-projetos".to_string(),
            api_base: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            per_page: 30,
            max_pages: 2,
            page_delay_secs: 1.0,
            fallback_description: "Descrição não disponível.".to_string(),
            include_forks: true,
            stylesheets: StylesheetMode::Inline,
            retry: None,
            publish: None,
        }
    }
}

impl FolioConfig {
    pub fn page_path(&self) -> PathBuf {
        self.site_dir.join(&self.page_file)
    }

    pub fn page_delay(&self) -> Result<Duration> {
        seconds("page_delay_secs", self.page_delay_secs)
    }

    pub fn fetch_policy(&self) -> Result<FetchPolicy> {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn publish_settings(&self) -> PublishConfig {
        self.publish.clone().unwrap_or_default()
    }

    /// Reads the API token from the configured environment variable.
    /// Empty or missing means anonymous requests.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("folio")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FolioConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FolioConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<FolioConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FolioConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
