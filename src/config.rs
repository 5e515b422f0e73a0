//! Configuration types for CLI verbosity and options.

use crate::git::{self, GitLogger};
use std::time::Duration;

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
    /// What to do when a force-sync fails.
    pub mode: SyncMode,
    /// Report changed files before touching each repository.
    pub show_status: bool,
    pub exclusions: Exclusions,
    /// Upper bound for a single git invocation.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            mode: SyncMode::default(),
            show_status: true,
            exclusions: Exclusions::default(),
            timeout: crate::constants::git_timeout(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.mode == SyncMode::Interactive
    }

    /// Returns the appropriate git logger based on verbosity settings.
    #[must_use]
    pub fn git_logger(&self) -> GitLogger {
        if self.is_verbose() {
            git::verbose_logger
        } else {
            git::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Behavior when resetting and pulling a repository fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Ask the operator before retrying once.
    #[default]
    Interactive,
    /// Single best-effort attempt, never prompt.
    Batch,
}

/// How exclusion tokens are compared against directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcludeMatch {
    /// Name contains the token anywhere (`lib` also excludes `library`).
    #[default]
    Substring,
    /// Name equals the token.
    Exact,
}

/// Directory names to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    tokens: Vec<String>,
    matching: ExcludeMatch,
}

impl Exclusions {
    /// Builds the set from raw tokens; blank tokens are dropped.
    pub fn new<I, S>(tokens: I, matching: ExcludeMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens, matching }
    }

    /// Parses a comma-separated list such as `vendor,scratch`.
    pub fn parse(list: &str, matching: ExcludeMatch) -> Self {
        Self::new(list.split(','), matching)
    }

    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.tokens.iter().any(|token| match self.matching {
            ExcludeMatch::Substring => name.contains(token.as_str()),
            ExcludeMatch::Exact => name == token,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
