//! Commit and push the updated site with the `git` command-line tool.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use crate::config::PublishConfig;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs git subcommands in a working directory.
pub trait GitRunner {
    fn run(&self, dir: &Path, args: &[&str]) -> io::Result<GitOutput>;
}

/// Invokes the `git` binary found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> io::Result<GitOutput> {
        let output = Command::new("git").args(args).current_dir(dir).output()?;
        Ok(GitOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStep {
    Add,
    Status,
    Commit,
    Push,
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GitStep::Add => "git add",
            GitStep::Status => "git status",
            GitStep::Commit => "git commit",
            GitStep::Push => "git push",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("{step}: could not run git: {source}")]
    Spawn {
        step: GitStep,
        #[source]
        source: io::Error,
    },
    #[error("{step} failed ({}): {stderr}", status_text(.code))]
    Failed {
        step: GitStep,
        code: Option<i32>,
        stderr: String,
    },
}

fn status_text(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {c}"),
        None => "terminated by signal".to_string(),
    }
}

impl PublishError {
    pub fn step(&self) -> GitStep {
        match self {
            PublishError::Spawn { step, .. } | PublishError::Failed { step, .. } => *step,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Changes were committed and pushed.
    Pushed,
    /// The working tree was clean after staging; nothing was committed or pushed.
    NothingToCommit,
}

fn run_step<R: GitRunner>(
    runner: &R,
    dir: &Path,
    step: GitStep,
    args: &[&str],
) -> Result<GitOutput, PublishError> {
    tracing::debug!(?args, "running {}", step);
    let out = runner
        .run(dir, args)
        .map_err(|source| PublishError::Spawn { step, source })?;
    if !out.success {
        return Err(PublishError::Failed {
            step,
            code: out.code,
            stderr: out.stderr.trim().to_string(),
        });
    }
    Ok(out)
}

/// Stages everything under `dir`, commits with the configured message and
/// pushes to the configured remote (and branch, if set). Stops at the first
/// failing step.
pub fn publish<R: GitRunner>(
    runner: &R,
    dir: &Path,
    settings: &PublishConfig,
) -> Result<PublishOutcome, PublishError> {
    run_step(runner, dir, GitStep::Add, &["add", "-A"])?;

    let status = run_step(runner, dir, GitStep::Status, &["status", "--porcelain"])?;
    if status.stdout.trim().is_empty() {
        tracing::info!("nothing to commit in {}", dir.display());
        return Ok(PublishOutcome::NothingToCommit);
    }

    run_step(
        runner,
        dir,
        GitStep::Commit,
        &["commit", "-m", settings.message.as_str()],
    )?;

    let mut push = vec!["push", settings.remote.as_str()];
    if let Some(branch) = settings.branch.as_deref() {
        push.push(branch);
    }
    run_step(runner, dir, GitStep::Push, &push)?;
    tracing::info!(remote = %settings.remote, "published {}", dir.display());
    Ok(PublishOutcome::Pushed)
}
