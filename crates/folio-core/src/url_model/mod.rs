//! URL modeling and asset filename derivation.
//!
//! Local asset names are a pure function of the URL, plus the response
//! content type when the URL carries no extension.

mod mime;
mod path;
mod sanitize;

pub use mime::extension_for_content_type;
pub use path::{filename_from_url_path, has_explicit_scheme};
pub use sanitize::sanitize_stem;

use sha2::{Digest, Sha256};

/// Hex digits of the URL hash kept in the file name.
const HASH_LEN: usize = 12;

/// Stem used when the URL path has no usable file name.
const DEFAULT_STEM: &str = "asset";

/// Short, stable hash of the URL string.
pub fn url_digest(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_LEN);
    hex
}

/// Splits `name` into stem and extension (with the dot). Extensions must be
/// short and alphanumeric, so `v1.2-final` has none.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(i) if i > 0 => {
            let ext = &name[i + 1..];
            if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                (&name[..i], Some(&name[i..]))
            } else {
                (name, None)
            }
        }
        _ => (name, None),
    }
}

/// Derives the local file name for an asset URL.
///
/// `<sanitized stem>-<12 hex of sha256(url)><ext>`, where the extension comes
/// from the URL path, else from `content_type`, else is empty. URLs without a
/// path file name become `asset-<hash><ext>`.
///
/// # Examples
///
/// - `https://cdn.example.com/img/logo.png` → `logo-<hash>.png`
/// - `https://avatars.example.com/u/42` with `image/jpeg` → `42-<hash>.jpg`
pub fn asset_file_name(url: &str, content_type: Option<&str>) -> String {
    let digest = url_digest(url);
    let (stem, ext) = match filename_from_url_path(url) {
        Some(name) => {
            let (stem, ext) = split_extension(&name);
            (
                sanitize_stem(stem),
                ext.map(|e| e.to_ascii_lowercase()),
            )
        }
        None => (String::new(), None),
    };
    let ext = ext
        .or_else(|| content_type.and_then(extension_for_content_type).map(str::to_string))
        .unwrap_or_default();
    let stem = if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    };
    format!("{}-{}{}", stem, digest, ext)
}
