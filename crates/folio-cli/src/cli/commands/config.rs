//! `folio config` – print where the config lives and what is in effect.

use anyhow::Result;
use folio_core::config::{self, FolioConfig};
use folio_core::logging;
use std::path::Path;

pub fn run_config(cfg: &FolioConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    let token = if cfg.token().is_some() { "set" } else { "not set" };
    println!("# {}: {}", cfg.token_env, token);
    if let Ok(log) = logging::log_file_path() {
        println!("# log: {}", log.display());
    }
    Ok(())
}
