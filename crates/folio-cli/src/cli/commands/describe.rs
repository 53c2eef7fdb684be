//! `folio describe` – show what description a README would produce.

use anyhow::{Context, Result};
use folio_core::config::FolioConfig;
use folio_core::describe::extract_description;
use std::path::Path;

pub fn run_describe(cfg: &FolioConfig, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    println!(
        "{}",
        extract_description(Some(text.as_ref()), &cfg.fallback_description)
    );
    Ok(())
}
