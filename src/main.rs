use anyhow::Context;
use clap::Parser;
use git_sync_all::cli::Cli;
use git_sync_all::output::{self, ConsoleCallbacks};
use git_sync_all::prompt::TerminalConfirm;
use git_sync_all::repo;
use git_sync_all::runner::SystemRunner;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config();

    let cwd = std::env::current_dir().context("Error getting current directory")?;
    output::print_working_dir(&cwd, &config);

    let repos = repo::find_git_repos(&cwd, &config.exclusions)?;
    output::print_workspace_start(repos.len(), &config);

    let start = Instant::now();
    let runner = SystemRunner::new(config.timeout);
    let callbacks = ConsoleCallbacks::new(config.clone());
    let report = repo::sync_workspace(&repos, &runner, &TerminalConfirm, &callbacks, &config);

    output::print_summary(&report, start.elapsed(), &config);

    Ok(())
}
