//! Command-line arguments.

use crate::config::{Config, ExcludeMatch, Exclusions, SyncMode, Verbosity};
use clap::Parser;
use std::time::Duration;

/// Reset and pull every git repository directly under the current directory.
#[derive(Debug, Parser)]
#[command(name = "git-sync-all", version, about)]
pub struct Cli {
    /// Comma-separated list of directories to exclude
    #[arg(short = 'x', long = "exclude", value_delimiter = ',', value_name = "NAMES")]
    pub exclude: Vec<String>,

    /// Exclude only directories whose name equals a listed name
    #[arg(long)]
    pub exact_exclude: bool,

    /// Never prompt; a failed reset and pull is reported and skipped
    #[arg(long)]
    pub batch: bool,

    /// Skip the changed-files report before each repository
    #[arg(long)]
    pub no_status: bool,

    /// Timeout for each git command, in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Only print errors and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Echo every git command
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn into_config(self) -> Config {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        let matching = if self.exact_exclude {
            ExcludeMatch::Exact
        } else {
            ExcludeMatch::Substring
        };

        Config {
            verbosity,
            mode: if self.batch {
                SyncMode::Batch
            } else {
                SyncMode::Interactive
            },
            show_status: !self.no_status,
            exclusions: Exclusions::new(&self.exclude, matching),
            timeout: self
                .timeout
                .map(Duration::from_secs)
                .unwrap_or_else(crate::constants::git_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("git-sync-all").chain(args.iter().copied());
        Cli::parse_from(argv).into_config()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.mode, SyncMode::Interactive);
        assert!(config.show_status);
        assert!(config.exclusions.is_empty());
    }

    #[test]
    fn test_exclude_list_is_comma_separated() {
        let config = parse(&["-x", "vendor,tmp"]);
        assert!(config.exclusions.is_excluded("vendor"));
        assert!(config.exclusions.is_excluded("tmp-stuff"));
        assert!(!config.exclusions.is_excluded("app"));
    }

    #[test]
    fn test_exact_exclude_switches_matching() {
        let config = parse(&["-x", "lib", "--exact-exclude"]);
        assert!(config.exclusions.is_excluded("lib"));
        assert!(!config.exclusions.is_excluded("library"));
    }

    #[test]
    fn test_batch_quiet_and_timeout() {
        let config = parse(&["--batch", "-q", "--no-status", "--timeout", "7"]);
        assert_eq!(config.mode, SyncMode::Batch);
        assert!(config.is_quiet());
        assert!(!config.show_status);
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let argv = ["git-sync-all", "-q", "-v"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let argv = ["git-sync-all", "--timeout", "0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
