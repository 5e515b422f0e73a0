//! Workspace-wide git repository synchronizer.
//!
//! This crate brings every repository under a directory up to date by:
//! - Reporting locally changed files
//! - Rewriting the origin URL to its canonical hosting form
//! - Hard-resetting to `origin/HEAD` and removing untracked files
//! - Pulling from the remote
//! - Asking before a single destructive retry when that fails

pub mod cli;
pub mod config;
pub mod constants;
pub mod git;
pub mod output;
pub mod prompt;
pub mod repo;
pub mod runner;
pub mod url;
