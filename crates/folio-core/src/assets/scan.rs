//! Find and rewrite externally hosted asset references in HTML.
//!
//! Tracked references:
//! - `<img src>`
//! - `<link rel="icon" href>` (any rel token containing `icon`)
//! - `<meta property="og:image" content>` and the twitter equivalent
//! - `<link rel="stylesheet" href>`
//! - `data-imagem="…"` on any element (gallery script)
//!
//! Only absolute `http(s)://` URLs count; relative paths are already local.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

use crate::url_model::has_explicit_scheme;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(img|link|meta)\b[^>]*>").unwrap());
static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static DATA_IMAGEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(\bdata-imagem\s*=\s*")([^"]*)(")"#).unwrap());

const SOCIAL_IMAGE_KEYS: &[&str] = &[
    "og:image",
    "og:image:url",
    "og:image:secure_url",
    "twitter:image",
    "twitter:image:src",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    Image,
    Icon,
    SocialPreview,
    Stylesheet,
    GalleryImage,
}

/// One occurrence of a tracked external URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssetRef {
    pub kind: AssetKind,
    /// URL with `&amp;` decoded, ready to request.
    pub url: String,
}

/// What to put in place of a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Replace the attribute value.
    Value(String),
    /// Replace the whole element (tag references only).
    Element(String),
}

struct Attr<'t> {
    name: String,
    value: &'t str,
    range: Range<usize>,
}

fn attrs(tag: &str) -> Vec<Attr<'_>> {
    ATTR.captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps.get(2).or_else(|| caps.get(3))?;
            Some(Attr {
                name,
                value: value.as_str(),
                range: value.range(),
            })
        })
        .collect()
}

fn attr<'a, 't>(attrs: &'a [Attr<'t>], name: &str) -> Option<&'a Attr<'t>> {
    attrs.iter().find(|a| a.name == name)
}

fn decode_amp(value: &str) -> String {
    value.trim().replace("&amp;", "&")
}

/// Which attribute of this tag holds a tracked URL, if any.
fn tracked<'a, 't>(tag_name: &str, attrs: &'a [Attr<'t>]) -> Option<(AssetKind, &'a Attr<'t>)> {
    let (kind, target) = match tag_name {
        "img" => (AssetKind::Image, attr(attrs, "src")?),
        "link" => {
            let rel = attr(attrs, "rel")?.value.to_ascii_lowercase();
            let kind = if rel.split_whitespace().any(|t| t == "stylesheet") {
                AssetKind::Stylesheet
            } else if rel.split_whitespace().any(|t| t.contains("icon")) {
                AssetKind::Icon
            } else {
                return None;
            };
            (kind, attr(attrs, "href")?)
        }
        "meta" => {
            let key = attr(attrs, "property")
                .or_else(|| attr(attrs, "name"))?
                .value
                .trim()
                .to_ascii_lowercase();
            if !SOCIAL_IMAGE_KEYS.contains(&key.as_str()) {
                return None;
            }
            (AssetKind::SocialPreview, attr(attrs, "content")?)
        }
        _ => return None,
    };
    if has_explicit_scheme(target.value) {
        Some((kind, target))
    } else {
        None
    }
}

/// All tracked external references in document order; tag references first,
/// then `data-imagem` attributes. Duplicates are kept.
pub fn find_assets(html: &str) -> Vec<AssetRef> {
    let mut found = Vec::new();
    for caps in TAG.captures_iter(html) {
        let tag = &caps[0];
        let name = caps[1].to_ascii_lowercase();
        let attrs = attrs(tag);
        if let Some((kind, a)) = tracked(&name, &attrs) {
            found.push(AssetRef {
                kind,
                url: decode_amp(a.value),
            });
        }
    }
    for caps in DATA_IMAGEM.captures_iter(html) {
        let value = &caps[2];
        if has_explicit_scheme(value) {
            found.push(AssetRef {
                kind: AssetKind::GalleryImage,
                url: decode_amp(value),
            });
        }
    }
    found
}

/// Rewrites every tracked reference for which `f` returns a replacement.
/// References `f` declines are left byte-for-byte unchanged.
pub fn rewrite_assets<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&AssetRef) -> Option<Rewrite>,
{
    let pass = TAG.replace_all(html, |caps: &Captures| {
        let tag = &caps[0];
        let name = caps[1].to_ascii_lowercase();
        let attrs = attrs(tag);
        let Some((kind, a)) = tracked(&name, &attrs) else {
            return tag.to_string();
        };
        let asset = AssetRef {
            kind,
            url: decode_amp(a.value),
        };
        match f(&asset) {
            Some(Rewrite::Value(v)) => {
                format!("{}{}{}", &tag[..a.range.start], v, &tag[a.range.end..])
            }
            Some(Rewrite::Element(e)) => e,
            None => tag.to_string(),
        }
    });

    DATA_IMAGEM
        .replace_all(&pass, |caps: &Captures| {
            let value = &caps[2];
            let replacement = if has_explicit_scheme(value) {
                let asset = AssetRef {
                    kind: AssetKind::GalleryImage,
                    url: decode_amp(value),
                };
                match f(&asset) {
                    Some(Rewrite::Value(v)) => Some(v),
                    _ => None,
                }
            } else {
                None
            };
            format!(
                "{}{}{}",
                &caps[1],
                replacement.as_deref().unwrap_or(value),
                &caps[3]
            )
        })
        .into_owned()
}
