//! CLI error types.

use relnotes_changelog::ChangelogError;
use relnotes_config::ConfigError;
use relnotes_vcs::VcsError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Changelog(#[from] ChangelogError),

    #[error("{0}")]
    Vcs(#[from] VcsError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
