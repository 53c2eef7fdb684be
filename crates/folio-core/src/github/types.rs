//! The slice of the GitHub REST payloads we read.

use serde::Deserialize;

/// One entry of `GET /users/{user}/repos`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// `GET /repos/{owner}/{repo}/readme`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmePayload {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}
