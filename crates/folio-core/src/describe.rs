//! Derive a one-paragraph project description from README markdown.
//!
//! Heuristic: split on blank lines, clean each paragraph of markdown
//! decoration, and take the first one long enough to say something.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cleaned paragraphs shorter than this (in characters) are skipped.
pub const MIN_DESCRIPTION_CHARS: usize = 21;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
/// Only the wrapper elements READMEs actually use, so prose like `Vec<T>` or
/// `<user@host>` is left alone.
static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:p|h[1-6]|img|a|br|div|span|b|i|em|strong|picture|source|sub|sup)\b[^>]*>")
        .unwrap()
});
static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:>[ \t]*)+").unwrap());
static DECORATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*_`~\-]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strips markdown images, link syntax (keeping the text), common HTML wrapper
/// elements, leading quote markers and heading/emphasis punctuation, then
/// collapses whitespace.
pub fn clean_paragraph(paragraph: &str) -> String {
    let text = IMAGE.replace_all(paragraph, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, " ");
    let text = BLOCKQUOTE.replace_all(&text, " ");
    let text = DECORATION.replace_all(&text, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Returns the first substantive README paragraph, or `fallback` when there
/// is no README or nothing in it qualifies.
pub fn extract_description(readme: Option<&str>, fallback: &str) -> String {
    let Some(readme) = readme else {
        return fallback.to_string();
    };
    PARAGRAPH_BREAK
        .split(readme)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(clean_paragraph)
        .find(|p| p.chars().count() >= MIN_DESCRIPTION_CHARS)
        .unwrap_or_else(|| fallback.to_string())
}
