// Repository detection, sync logic, result types

use crate::config::{Config, Exclusions};
use crate::constants::GIT_DIR;
use crate::git::Git;
use crate::prompt::Confirm;
use crate::runner::CommandRunner;
use crate::url;
use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Started,
    CheckingChanges,
    ReadingRemote,
    RewritingRemote,
    Syncing,
    AwaitingConfirmation,
    Retrying,
    Completed,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Started => "started",
            SyncStep::CheckingChanges => "checking changes",
            SyncStep::ReadingRemote => "reading remote URL",
            SyncStep::RewritingRemote => "rewriting remote URL",
            SyncStep::Syncing => "reset and pull",
            SyncStep::AwaitingConfirmation => "awaiting confirmation",
            SyncStep::Retrying => "retrying reset and pull",
            SyncStep::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct SyncResult {
    pub path: PathBuf,
    pub outcome: SyncOutcome,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Reset and pull succeeded, possibly after a confirmed retry.
    Updated { url_rewritten: bool, retried: bool },
    /// Reset and pull failed and no retry was made.
    Declined { error: String },
    /// The confirmed retry failed as well.
    RetryFailed { error: String },
    /// Gave up before syncing.
    Failed(SyncFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub error: String,
    pub step: SyncStep,
}

#[derive(Debug)]
struct SyncError {
    source: anyhow::Error,
    step: SyncStep,
}

impl SyncResult {
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Updated { .. })
    }
}

/// Receives progress notifications while a repository is synced.
///
/// All methods default to no-ops so implementors only override what they show.
pub trait SyncCallbacks {
    fn on_repo_start(&self, _path: &Path) {}
    fn on_step(&self, _step: &SyncStep) {}
    fn on_changed_files(&self, _path: &Path, _files: &[String]) {}
    fn on_remote_rewritten(&self, _path: &Path, _from: &str, _to: &str) {}
    /// A reset or clean failed; the pull still decides the result.
    fn on_ignored_error(&self, _path: &Path, _error: &anyhow::Error) {}
    /// The first reset and pull attempt failed.
    fn on_sync_failed(&self, _path: &Path, _error: &anyhow::Error) {}
    fn on_complete(&self, _result: &SyncResult) {}
}

/// Outcome of a whole workspace run, in processing order.
#[derive(Debug, Default)]
pub struct WorkspaceReport {
    pub results: Vec<SyncResult>,
}

impl WorkspaceReport {
    /// Repositories that failed to sync and were not retried.
    #[must_use]
    pub fn not_updated(&self) -> Vec<&Path> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::Declined { .. }))
            .map(|r| r.path.as_path())
            .collect()
    }

    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_updated()).count()
    }
}

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    path.join(GIT_DIR).exists()
}

/// Immediate subdirectories of `root` that are repositories and not excluded,
/// in directory-listing order.
pub fn find_git_repos(root: &Path, exclusions: &Exclusions) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Error reading directory {}", root.display()))?;

    Ok(entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| !exclusions.is_excluded(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .filter(|p| is_git_repo(p))
        .collect())
}

/// Question asked before a destructive retry.
#[must_use]
pub fn retry_question(path: &Path) -> String {
    format!(
        "Do you want to reset local changes and pull the latest updates for {}? (y/n)",
        path.display()
    )
}

fn at_step<T>(step: SyncStep, result: anyhow::Result<T>) -> Result<T, SyncError> {
    result.map_err(|e| SyncError { source: e, step })
}

/// Syncs every repository in order. One repository failing never stops the run.
pub fn sync_workspace(
    repos: &[PathBuf],
    runner: &dyn CommandRunner,
    confirm: &dyn Confirm,
    callbacks: &impl SyncCallbacks,
    config: &Config,
) -> WorkspaceReport {
    let git = Git::new(runner, config.git_logger());
    let results = repos
        .iter()
        .map(|path| sync_repo(path, &git, confirm, callbacks, config))
        .collect();
    WorkspaceReport { results }
}

pub fn sync_repo(
    path: &Path,
    git: &Git<'_>,
    confirm: &dyn Confirm,
    callbacks: &impl SyncCallbacks,
    config: &Config,
) -> SyncResult {
    let start = Instant::now();
    callbacks.on_repo_start(path);

    let outcome = match do_sync(path, git, confirm, callbacks, config) {
        Ok(outcome) => outcome,
        Err(e) => SyncOutcome::Failed(SyncFailure {
            error: format!("{:#}", e.source),
            step: e.step,
        }),
    };

    callbacks.on_step(&SyncStep::Completed);
    let result = SyncResult {
        path: path.to_path_buf(),
        outcome,
        duration: start.elapsed(),
    };
    callbacks.on_complete(&result);
    result
}

fn do_sync(
    path: &Path,
    git: &Git<'_>,
    confirm: &dyn Confirm,
    callbacks: &impl SyncCallbacks,
    config: &Config,
) -> Result<SyncOutcome, SyncError> {
    callbacks.on_step(&SyncStep::Started);

    // Status failures only cost us the report.
    let changed_files = if config.show_status || config.is_interactive() {
        callbacks.on_step(&SyncStep::CheckingChanges);
        git.changed_files(path).unwrap_or_default()
    } else {
        Vec::new()
    };
    if config.show_status {
        callbacks.on_changed_files(path, &changed_files);
    }

    callbacks.on_step(&SyncStep::ReadingRemote);
    let remote_url = at_step(SyncStep::ReadingRemote, git.remote_url(path))?;

    let canonical = url::canonicalize(&remote_url);
    let url_rewritten = canonical != remote_url;
    if url_rewritten {
        callbacks.on_step(&SyncStep::RewritingRemote);
        at_step(
            SyncStep::RewritingRemote,
            git.set_remote_url(path, &canonical),
        )?;
        callbacks.on_remote_rewritten(path, &remote_url, &canonical);
    }

    callbacks.on_step(&SyncStep::Syncing);
    let error = match force_sync(path, git, callbacks) {
        Ok(()) => {
            return Ok(SyncOutcome::Updated {
                url_rewritten,
                retried: false,
            });
        }
        Err(e) => {
            callbacks.on_sync_failed(path, &e);
            format!("{:#}", e)
        }
    };

    if !config.is_interactive() {
        return Ok(SyncOutcome::Declined { error });
    }

    callbacks.on_step(&SyncStep::AwaitingConfirmation);
    callbacks.on_changed_files(path, &changed_files);
    if !confirm.confirm(&retry_question(path)) {
        return Ok(SyncOutcome::Declined { error });
    }

    callbacks.on_step(&SyncStep::Retrying);
    match force_sync(path, git, callbacks) {
        Ok(()) => Ok(SyncOutcome::Updated {
            url_rewritten,
            retried: true,
        }),
        Err(e) => Ok(SyncOutcome::RetryFailed {
            error: format!("{:#}", e),
        }),
    }
}

fn force_sync(path: &Path, git: &Git<'_>, callbacks: &impl SyncCallbacks) -> anyhow::Result<()> {
    git.force_sync(path, |e| callbacks.on_ignored_error(path, e))
}
