//! Spinner, colored output, and summary formatting.
//!
//! This module provides visual feedback while repositories are synced:
//! a spinner naming the current step, one line per event, and the
//! end-of-run list of repositories that were not updated.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::repo::{SyncCallbacks, SyncOutcome, SyncResult, SyncStep, WorkspaceReport};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

/// No-op callbacks for when output is not needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl SyncCallbacks for NoOpCallbacks {}

/// Prints every sync event to the terminal.
///
/// The spinner only exists between steps; it is suspended while lines are
/// printed and cleared before the operator is prompted.
pub struct ConsoleCallbacks {
    config: Config,
    spinner: RefCell<Option<ProgressBar>>,
}

impl ConsoleCallbacks {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            spinner: RefCell::new(None),
        }
    }

    fn show_spinner(&self) -> bool {
        !(self.config.is_quiet() || self.config.is_verbose())
    }

    fn emit<F: FnOnce()>(&self, print: F) {
        match self.spinner.borrow().as_ref() {
            Some(spinner) => spinner.suspend(print),
            None => print(),
        }
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    fn set_spinner_message(&self, step: &SyncStep) {
        if !self.show_spinner() {
            return;
        }
        let mut slot = self.spinner.borrow_mut();
        let spinner = slot.get_or_insert_with(create_spinner);
        spinner.set_message(format_step_message(step));
    }
}

impl SyncCallbacks for ConsoleCallbacks {
    fn on_repo_start(&self, path: &Path) {
        if self.config.is_verbose() {
            eprintln!("\n{}", format!("[{}]", path.display()).white().bold());
        }
    }

    fn on_step(&self, step: &SyncStep) {
        match step {
            SyncStep::AwaitingConfirmation | SyncStep::Completed => self.clear_spinner(),
            _ => self.set_spinner_message(step),
        }
        print_step(&self.config, step);
    }

    fn on_changed_files(&self, path: &Path, files: &[String]) {
        if self.config.is_quiet() {
            return;
        }
        self.emit(|| print_changed_files(path, files));
    }

    fn on_remote_rewritten(&self, path: &Path, from: &str, to: &str) {
        if self.config.is_quiet() {
            return;
        }
        self.emit(|| {
            println!(
                "{} {}",
                "Updated remote URL for repo at".cyan(),
                path.display()
            );
            if self.config.is_verbose() {
                eprintln!("  {} {} {}", from.dimmed(), "->".dimmed(), to.dimmed());
            }
        });
    }

    fn on_ignored_error(&self, path: &Path, error: &anyhow::Error) {
        if self.config.is_verbose() {
            eprintln!(
                "  {} {}: {:#}",
                "ignored".yellow(),
                path.display(),
                error
            );
        }
    }

    fn on_sync_failed(&self, path: &Path, error: &anyhow::Error) {
        self.emit(|| {
            eprintln!(
                "{} {} due to local changes: {:#}",
                "Error updating repo".red(),
                path.display(),
                error
            )
        });
    }

    fn on_complete(&self, result: &SyncResult) {
        self.clear_spinner();
        print_outcome(result, &self.config);
    }
}

/// Prints a step progress line in verbose mode.
pub fn print_step(config: &Config, step: &SyncStep) {
    if !config.is_verbose() {
        return;
    }
    eprintln!("  {}...", step.to_string().dimmed());
}

fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    spinner
}

fn print_changed_files(path: &Path, files: &[String]) {
    if files.is_empty() {
        println!("{} {}", "No changes in repo".dimmed(), path.display());
        return;
    }
    println!(
        "{} {}:",
        "Changed files in repo".yellow(),
        path.display().to_string().white().bold()
    );
    for file in files {
        println!("   {}", file);
    }
}

fn print_outcome(result: &SyncResult, config: &Config) {
    let path = result.path.display();
    match &result.outcome {
        SyncOutcome::Updated { retried, .. } => {
            if config.is_quiet() {
                return;
            }
            let retry_msg = if *retried {
                " (after retry)".yellow()
            } else {
                "".normal()
            };
            println!(
                "{} {}{} in {}",
                "Updated repo".green(),
                path,
                retry_msg,
                format_duration(result.duration).dimmed()
            );
        }
        // Reported when the first attempt failed; listed again in the summary.
        SyncOutcome::Declined { .. } => {}
        SyncOutcome::RetryFailed { error } => {
            eprintln!(
                "{} {}: {}",
                "Error after reset and pull for repo".red(),
                path,
                error
            );
        }
        SyncOutcome::Failed(failure) => {
            let what = match failure.step {
                SyncStep::RewritingRemote => "Error updating remote URL for repo",
                _ => "Error getting remote URL for repo",
            };
            eprintln!("{} {}: {}", what.red(), path, failure.error);
        }
    }
}

pub fn print_working_dir(path: &Path, config: &Config) {
    if config.is_quiet() {
        return;
    }
    println!(
        "{} {}",
        "Working in:".cyan(),
        path.display().to_string().white().bold()
    )
}

pub fn print_workspace_start(count: usize, config: &Config) {
    if config.is_quiet() {
        return;
    }
    if count == 0 {
        println!("{}", "No git repositories found".yellow().bold())
    } else {
        println!("{}", format!("Syncing {} repositories", count).dimmed())
    }
}

pub fn print_summary(report: &WorkspaceReport, duration: Duration, config: &Config) {
    let not_updated = report.not_updated();
    if !not_updated.is_empty() {
        println!(
            "\n{}",
            "Repositories not updated due to local changes:".red().bold()
        );
        for path in &not_updated {
            println!("{}", path.display());
        }
    }

    if config.is_quiet() {
        println!(
            "{}/{} repositories updated",
            report.updated_count(),
            report.results.len()
        );
    } else if !report.results.is_empty() {
        println!(
            "\n{}: {}/{} repos in {}",
            "Total".white().bold(),
            report.updated_count(),
            report.results.len(),
            format_duration(duration)
        );
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn format_step_message(step: &SyncStep) -> &'static str {
    match step {
        SyncStep::Started => "Starting sync...",
        SyncStep::CheckingChanges => "Checking for local changes...",
        SyncStep::ReadingRemote => "Reading remote URL...",
        SyncStep::RewritingRemote => "Rewriting remote URL...",
        SyncStep::Syncing => "Resetting and pulling from origin...",
        SyncStep::AwaitingConfirmation => "Waiting for confirmation...",
        SyncStep::Retrying => "Retrying reset and pull...",
        SyncStep::Completed => "Completed",
    }
}
