//! Asset localization: download externally hosted page assets once and point
//! the page at the local copies.
//!
//! A failed download is not fatal: the reference keeps its remote URL, a
//! warning is logged, and the URL is listed in the report.

mod scan;

pub use scan::{find_assets, rewrite_assets, AssetKind, AssetRef, Rewrite};

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::config::StylesheetMode;
use crate::fetch::Fetcher;
use crate::http::Transport;
use crate::url_model::asset_file_name;

/// Outcome of one localization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Unique URLs saved under the assets directory.
    pub localized: usize,
    /// Unique stylesheets inlined into `<style>` blocks.
    pub inlined: usize,
    /// URLs that could not be fetched or saved; left pointing at the remote.
    pub failed: Vec<String>,
}

pub struct AssetLocalizer<'f, T, C> {
    fetcher: &'f Fetcher<T, C>,
    site_dir: PathBuf,
    assets_dir: String,
    stylesheets: StylesheetMode,
}

impl<'f, T: Transport, C: Clock> AssetLocalizer<'f, T, C> {
    /// `assets_dir` is relative to `site_dir` and is also the prefix written into the page.
    pub fn new(
        fetcher: &'f Fetcher<T, C>,
        site_dir: &Path,
        assets_dir: &str,
        stylesheets: StylesheetMode,
    ) -> Self {
        Self {
            fetcher,
            site_dir: site_dir.to_path_buf(),
            assets_dir: assets_dir.trim_matches('/').to_string(),
            stylesheets,
        }
    }

    fn assets_path(&self) -> PathBuf {
        self.site_dir.join(&self.assets_dir)
    }

    fn inlines(&self, asset: &AssetRef) -> bool {
        asset.kind == AssetKind::Stylesheet && self.stylesheets == StylesheetMode::Inline
    }

    /// Downloads `url` into the assets directory and returns the page-relative path.
    fn download(&self, url: &str) -> Result<String> {
        let resp = self.fetcher.get(url)?;
        let name = asset_file_name(url, resp.content_type().as_deref());
        let dst = self.assets_path().join(&name);
        fs::write(&dst, &resp.body).with_context(|| format!("write {}", dst.display()))?;
        tracing::debug!(url, path = %dst.display(), bytes = resp.body.len(), "saved asset");
        Ok(format!("{}/{}", self.assets_dir, name))
    }

    fn fetch_stylesheet(&self, url: &str) -> Result<String> {
        let resp = self.fetcher.get(url)?;
        Ok(resp.text())
    }

    /// Localizes every tracked external reference in `html`.
    ///
    /// Each unique URL is requested at most once; every occurrence of a URL
    /// is rewritten to the same local path. Running this on its own output
    /// changes nothing.
    pub fn localize(&self, html: &str) -> Result<(String, AssetReport)> {
        let refs = find_assets(html);
        let mut report = AssetReport::default();
        if refs.is_empty() {
            return Ok((html.to_string(), report));
        }

        let mut to_download = BTreeSet::new();
        let mut to_inline = BTreeSet::new();
        for asset in &refs {
            if self.inlines(asset) {
                to_inline.insert(asset.url.clone());
            } else {
                to_download.insert(asset.url.clone());
            }
        }

        let mut local: BTreeMap<String, String> = BTreeMap::new();
        if !to_download.is_empty() {
            let dir = self.assets_path();
            fs::create_dir_all(&dir)
                .with_context(|| format!("create assets dir {}", dir.display()))?;
        }
        for url in &to_download {
            match self.download(url) {
                Ok(path) => {
                    local.insert(url.clone(), path);
                }
                Err(e) => {
                    tracing::warn!("could not localize {}: {:#}", url, e);
                    report.failed.push(url.clone());
                }
            }
        }

        let mut css: BTreeMap<String, String> = BTreeMap::new();
        for url in &to_inline {
            match self.fetch_stylesheet(url) {
                Ok(text) => {
                    css.insert(url.clone(), text);
                }
                Err(e) => {
                    tracing::warn!("could not inline stylesheet {}: {:#}", url, e);
                    report.failed.push(url.clone());
                }
            }
        }

        report.localized = local.len();
        report.inlined = css.len();

        let out = rewrite_assets(html, |asset| {
            if self.inlines(asset) {
                css.get(&asset.url).map(|text| Rewrite::Element(style_block(text)))
            } else {
                local.get(&asset.url).map(|p| Rewrite::Value(p.clone()))
            }
        });
        Ok((out, report))
    }
}

/// Wraps CSS in a `<style>` element; a literal `</style` inside would end it early.
fn style_block(css: &str) -> String {
    format!("<style>\n{}\n</style>", css.replace("</style", "<\\/style"))
}
