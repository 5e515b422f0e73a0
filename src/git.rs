//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution and error formatting.

use anyhow::Context;
use colored::Colorize;
use std::path::Path;

use crate::constants::{REMOTE_NAME, RESET_TARGET};
use crate::runner::CommandRunner;

/// Callback invoked with the repository and arguments before each git command.
pub type GitLogger = fn(&Path, &[&str]);

pub fn verbose_logger(repo: &Path, args: &[&str]) {
    eprintln!(
        "  {} {}",
        format!("[{}]", repo.display()).dimmed(),
        format!("git {}", args.join(" ")).dimmed()
    );
}

pub fn no_op_logger(_repo: &Path, _args: &[&str]) {}

/// Git operations bound to a command runner.
#[derive(Clone, Copy)]
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    logger: GitLogger,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner, logger: GitLogger) -> Self {
        Self { runner, logger }
    }

    /// Runs `git args...` in `repo` and returns trimmed stdout.
    pub fn run_git(&self, repo: &Path, args: &[&str]) -> anyhow::Result<String> {
        (self.logger)(repo, args);
        let output = self
            .runner
            .run(repo, "git", args)
            .context("Failed to execute git command")?;

        if output.success() {
            Ok(output.stdout.trim().to_string())
        } else {
            anyhow::bail!("git {} failed: {}", args.join(" "), output.stderr.trim())
        }
    }

    pub fn remote_url(&self, repo: &Path) -> anyhow::Result<String> {
        self.run_git(repo, &["remote", "get-url", REMOTE_NAME])
            .context("Failed to read remote URL")
    }

    pub fn set_remote_url(&self, repo: &Path, url: &str) -> anyhow::Result<()> {
        validate_url(url)?;
        self.run_git(repo, &["remote", "set-url", REMOTE_NAME, url])
            .context("Failed to set remote URL")?;
        Ok(())
    }

    /// Paths reported by `git status --porcelain`.
    pub fn changed_files(&self, repo: &Path) -> anyhow::Result<Vec<String>> {
        // Untrimmed so the first line keeps its leading status column.
        (self.logger)(repo, &["status", "--porcelain"]);
        let output = self
            .runner
            .run(repo, "git", &["status", "--porcelain"])
            .context("Failed to check for uncommitted changes")?;
        if !output.success() {
            anyhow::bail!("git status --porcelain failed: {}", output.stderr.trim());
        }
        Ok(parse_changed_files(&output.stdout))
    }

    pub fn reset_hard(&self, repo: &Path) -> anyhow::Result<()> {
        self.run_git(repo, &["reset", "--hard", RESET_TARGET])
            .with_context(|| format!("Failed to reset to {}", RESET_TARGET))?;
        Ok(())
    }

    pub fn clean(&self, repo: &Path) -> anyhow::Result<()> {
        self.run_git(repo, &["clean", "-fd"])
            .context("Failed to remove untracked files")?;
        Ok(())
    }

    pub fn pull(&self, repo: &Path) -> anyhow::Result<()> {
        self.run_git(repo, &["pull"])
            .context("Failed to pull from remote")?;
        Ok(())
    }

    /// Hard reset, clean, then pull. Only the pull decides the result;
    /// reset and clean failures are handed to `on_ignored`.
    pub fn force_sync<F>(&self, repo: &Path, on_ignored: F) -> anyhow::Result<()>
    where
        F: Fn(&anyhow::Error),
    {
        if let Err(e) = self.reset_hard(repo) {
            on_ignored(&e);
        }
        if let Err(e) = self.clean(repo) {
            on_ignored(&e);
        }
        self.pull(repo)
    }
}

/// Second whitespace-separated token of each porcelain line.
/// Lines with fewer than two tokens are skipped.
#[must_use]
pub fn parse_changed_files(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

fn validate_url(url: &str) -> anyhow::Result<()> {
    if url.contains('\0') || url.contains('\n') || url.trim().is_empty() {
        anyhow::bail!("Invalid remote URL: {:?}", url);
    }
    Ok(())
}
