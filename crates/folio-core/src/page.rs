//! Splice rendered cards into the placeholder container of the site page.
//!
//! The container is the `<div>` whose `id` matches; its opening tag is found
//! case-insensitively and across lines. The matching `</div>` is located by
//! counting nested `<div>`s, so a page already filled with cards (which hold
//! their own `</div>`s) is replaced cleanly on the next run.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

/// Div tags, plus comments and script/style bodies, which are matched whole
/// so that any `<div` text inside them is not counted.
static DIV_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<div\b[^>]*>|</div\s*>",
    )
    .unwrap()
});
static ID_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PageError {
    #[error("container <div id=\"{0}\"> not found in page")]
    ContainerNotFound(String),
    #[error("container <div id=\"{0}\"> is never closed")]
    UnclosedContainer(String),
}

fn is_div_tag(token: &str) -> bool {
    token
        .get(..4)
        .is_some_and(|p| p.eq_ignore_ascii_case("<div") || p.eq_ignore_ascii_case("</di"))
}

fn has_id(tag: &str, container_id: &str) -> bool {
    ID_ATTR
        .captures(tag)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .is_some_and(|id| id.as_str().trim().eq_ignore_ascii_case(container_id))
}

/// Byte range of the container's inner content.
pub fn locate_container(page: &str, container_id: &str) -> Result<Range<usize>, PageError> {
    let mut inner_start = None;
    let mut depth = 0usize;
    for token in DIV_TOKEN.find_iter(page) {
        let text = token.as_str();
        if !is_div_tag(text) {
            continue;
        }
        let closing = text.starts_with("</");
        match inner_start {
            None => {
                if !closing && has_id(text, container_id) {
                    inner_start = Some(token.end());
                    depth = 1;
                }
            }
            Some(start) => {
                if closing {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(start..token.start());
                    }
                } else if !text.ends_with("/>") {
                    depth += 1;
                }
            }
        }
    }
    match inner_start {
        Some(_) => Err(PageError::UnclosedContainer(container_id.to_string())),
        None => Err(PageError::ContainerNotFound(container_id.to_string())),
    }
}

/// Replaces the inner content of the container with `fragment`.
/// Everything outside the container is preserved byte-for-byte.
pub fn splice_container(page: &str, container_id: &str, fragment: &str) -> Result<String, PageError> {
    let inner = locate_container(page, container_id)?;
    let mut out = String::with_capacity(page.len() - inner.len() + fragment.len());
    out.push_str(&page[..inner.start]);
    out.push_str(fragment);
    out.push_str(&page[inner.end..]);
    Ok(out)
}

/// Writes `contents` to `path` via a temporary file in the same directory and
/// a rename, so readers never observe a half-written page.
pub fn write_page(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("write temp file for {}", path.display()))?;
    // Temp files are created owner-only; keep whatever mode the page had.
    if let Ok(meta) = fs::metadata(path) {
        let _ = tmp.as_file().set_permissions(meta.permissions());
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
