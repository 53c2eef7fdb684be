//! Tests for publish, describe, config, completions, man.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

#[test]
fn cli_parse_publish() {
    match parse(&["folio", "publish"]) {
        CliCommand::Publish { site_dir } => assert!(site_dir.is_none()),
        _ => panic!("expected Publish"),
    }
    match parse(&["folio", "publish", "--site-dir", "site"]) {
        CliCommand::Publish { site_dir } => assert_eq!(site_dir, Some(PathBuf::from("site"))),
        _ => panic!("expected Publish with --site-dir"),
    }
}

#[test]
fn cli_parse_describe() {
    match parse(&["folio", "describe", "README.md"]) {
        CliCommand::Describe { path } => assert_eq!(path, PathBuf::from("README.md")),
        _ => panic!("expected Describe"),
    }
}

#[test]
fn cli_describe_requires_path() {
    assert!(Cli::try_parse_from(["folio", "describe"]).is_err());
}

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["folio", "config"]), CliCommand::Config));
}

#[test]
fn cli_parse_completions() {
    match parse(&["folio", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(Cli::try_parse_from(["folio", "completions", "tcsh"]).is_err());
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["folio", "man"]), CliCommand::Man));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn default_log_filter_covers_this_binary() {
    let crate_name = module_path!().split("::").next().unwrap();
    assert_eq!(crate_name, "folio");
    let directive = format!("{crate_name}=debug");
    assert!(folio_core::logging::DEFAULT_FILTER
        .split(',')
        .any(|d| d == directive));
}
