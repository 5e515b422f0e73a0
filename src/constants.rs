//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic numbers throughout the codebase.

use std::time::Duration;

/// Default timeout for individual git operations (in seconds).
/// Pulls over slow links need more headroom than local queries.
const DEFAULT_GIT_TIMEOUT_SECS: u64 = 120;

/// Environment variable overriding the git command timeout.
pub const TIMEOUT_ENV_VAR: &str = "GIT_SYNC_TIMEOUT";

/// Returns the git command timeout.
///
/// Can be customized via the GIT_SYNC_TIMEOUT environment variable (in seconds).
/// Falls back to 120 seconds if not set or invalid.
///
/// Example: `GIT_SYNC_TIMEOUT=300 git-sync-all`
pub fn git_timeout() -> Duration {
    parse_timeout(std::env::var(TIMEOUT_ENV_VAR).ok().as_deref())
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS))
}

/// How often a running child process is polled for completion.
pub const CHILD_POLL_MS: u64 = 20;

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// Remote whose URL is canonicalized and pulled from.
pub const REMOTE_NAME: &str = "origin";

/// Reference the working tree is hard-reset to before pulling.
pub const RESET_TARGET: &str = "origin/HEAD";

/// The only answer that confirms a destructive retry.
pub const CONFIRM_ANSWER: &str = "y";
