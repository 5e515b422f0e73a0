//! Test infrastructure for git-sync-all integration tests.
#![allow(dead_code)]

use anyhow::Result;
use git_sync_all::config::Config;
use git_sync_all::git::{Git, no_op_logger};
use git_sync_all::prompt::{Confirm, is_confirmation};
use git_sync_all::repo::SyncCallbacks;
use git_sync_all::runner::{CommandOutput, CommandRunner, SystemRunner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub fn test_config() -> Config {
    Config {
        timeout: Duration::from_secs(60),
        ..Config::default()
    }
}

pub fn system_runner() -> SystemRunner {
    SystemRunner::new(Duration::from_secs(60))
}

pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let runner = system_runner();
    Git::new(&runner, no_op_logger).run_git(dir, args)
}

fn commit_file(repo: &Path, file: &str, contents: &str, message: &str) -> Result<()> {
    std::fs::write(repo.join(file), contents)?;
    run_git(repo, &["add", file])?;
    run_git(repo, &["commit", "-m", message])?;
    Ok(())
}

fn configure_user(repo: &Path) -> Result<()> {
    run_git(repo, &["config", "user.email", "test@example.com"])?;
    run_git(repo, &["config", "user.name", "Test User"])?;
    Ok(())
}

/// A clone of a local bare remote, with a seed checkout to push upstream
/// commits from. Everything is cleaned up when dropped.
pub struct TestRepo {
    remotes: TempDir,
    _own_dir: Option<TempDir>,
    path: PathBuf,
}

impl TestRepo {
    /// Creates a clone in its own temporary directory.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let mut repo = Self::clone_into(dir.path(), "repo")?;
        repo._own_dir = Some(dir);
        Ok(repo)
    }

    /// Creates a clone at `parent/name`; `origin/HEAD` points at master.
    pub fn clone_into(parent: &Path, name: &str) -> Result<Self> {
        let remotes = TempDir::new()?;
        let bare = remotes.path().join("remote.git");
        let seed = remotes.path().join("seed");

        run_git(remotes.path(), &["init", "--bare", "-b", "master", "remote.git"])?;
        run_git(remotes.path(), &["init", "-b", "master", "seed"])?;
        configure_user(&seed)?;
        commit_file(&seed, "README.md", "# Test Repo\n", "Initial commit")?;
        run_git(&seed, &["remote", "add", "origin", path_str(&bare)?])?;
        run_git(&seed, &["push", "-u", "origin", "master"])?;

        run_git(parent, &["clone", path_str(&bare)?, name])?;
        let path = parent.join(name);
        configure_user(&path)?;

        Ok(Self {
            remotes,
            _own_dir: None,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remote_path(&self) -> PathBuf {
        self.remotes.path().join("remote.git")
    }

    /// Commits and pushes a file from another checkout.
    pub fn push_upstream_commit(&self, file: &str, contents: &str) -> Result<()> {
        let seed = self.remotes.path().join("seed");
        commit_file(&seed, file, contents, &format!("Add {}", file))?;
        run_git(&seed, &["push", "origin", "master"])?;
        Ok(())
    }

    pub fn make_dirty(&self) -> Result<()> {
        std::fs::write(self.path.join("README.md"), "# Modified\n")?;
        Ok(())
    }

    pub fn make_untracked(&self) -> Result<()> {
        std::fs::write(self.path.join("untracked.txt"), "scratch\n")?;
        std::fs::create_dir_all(self.path.join("scratch-dir"))?;
        std::fs::write(self.path.join("scratch-dir").join("notes.md"), "notes\n")?;
        Ok(())
    }

    pub fn set_origin(&self, url: &str) -> Result<()> {
        run_git(&self.path, &["remote", "set-url", "origin", url])?;
        Ok(())
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).exists()
    }

    pub fn read(&self, name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path.join(name))?)
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("non-UTF-8 path: {}", path.display()))
}

/// Fake runner keyed by repository directory name and command line.
/// Unscripted commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<(String, String), Vec<CommandOutput>>,
    calls: RefCell<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response; the last one queued for a command repeats.
    pub fn respond(mut self, repo: &str, command: &str, code: i32, stdout: &str) -> Self {
        self.responses
            .entry((repo.to_string(), command.to_string()))
            .or_default()
            .push(CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: if code == 0 {
                    String::new()
                } else {
                    format!("fatal: {} failed", command)
                },
            });
        self
    }

    pub fn calls_in(&self, repo: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(r, _)| r == repo)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn count(&self, repo: &str, command: &str) -> usize {
        self.calls_in(repo).iter().filter(|c| *c == command).count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput> {
        assert_eq!(program, "git");
        let repo = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let command = args.join(" ");
        let key = (repo.clone(), command.clone());

        let seen = self
            .calls
            .borrow()
            .iter()
            .filter(|call| **call == key)
            .count();
        self.calls.borrow_mut().push(key.clone());

        Ok(match self.responses.get(&key) {
            Some(queue) => queue[seen.min(queue.len() - 1)].clone(),
            None => CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            },
        })
    }
}

/// Gives a fixed answer and remembers every question.
pub struct ScriptedConfirm {
    answer: String,
    questions: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            questions: RefCell::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        self.questions.borrow_mut().push(question.to_string());
        is_confirmation(&self.answer)
    }
}

/// Records reported events as plain strings.
#[derive(Default)]
pub struct RecordingCallbacks {
    events: RefCell<Vec<String>>,
}

impl RecordingCallbacks {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

fn name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl SyncCallbacks for RecordingCallbacks {
    fn on_changed_files(&self, path: &Path, files: &[String]) {
        self.record(format!("changes {}: {}", name(path), files.join(",")));
    }

    fn on_remote_rewritten(&self, path: &Path, _from: &str, to: &str) {
        self.record(format!("rewritten {}: {}", name(path), to));
    }

    fn on_sync_failed(&self, path: &Path, _error: &anyhow::Error) {
        self.record(format!("sync failed {}", name(path)));
    }
}
