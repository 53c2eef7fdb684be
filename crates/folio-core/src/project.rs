//! Project entries: the per-run view of a repository that gets rendered as a card.

use std::collections::BTreeSet;

use crate::describe::extract_description;
use crate::github::Repository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    /// Lower-cased, deduplicated; iteration order is sorted.
    pub tags: BTreeSet<String>,
    pub link: String,
}

impl ProjectEntry {
    pub fn from_repository(repo: &Repository, readme: Option<&str>, fallback: &str) -> Self {
        Self {
            title: repo.name.clone(),
            description: extract_description(readme, fallback),
            tags: derive_tags(repo),
            link: repo.html_url.clone(),
        }
    }
}

/// Tags for a repository: its primary language and topics, plus a couple of
/// keyword-derived ones (`aws` if the name or description mentions it,
/// `spark` for Scala projects or names mentioning it).
pub fn derive_tags(repo: &Repository) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let language = repo
        .language
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty());
    let name = repo.name.to_lowercase();
    let description = repo.description.as_deref().unwrap_or("").to_lowercase();

    if let Some(lang) = &language {
        tags.insert(lang.clone());
    }
    if name.contains("aws") || description.contains("aws") {
        tags.insert("aws".to_string());
    }
    if name.contains("spark") || language.as_deref() == Some("scala") {
        tags.insert("spark".to_string());
    }
    for topic in &repo.topics {
        let topic = topic.trim().to_lowercase();
        if !topic.is_empty() {
            tags.insert(topic);
        }
    }
    tags
}
