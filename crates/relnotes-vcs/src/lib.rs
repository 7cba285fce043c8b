//! Git remote lookup for relnotes.
//!
//! Release notes link issues relative to the "local" GitHub repository. When
//! it is not configured explicitly, it is derived from a git remote URL:
//!
//! - `git@github.com:owner/repo.git`
//! - `https://github.com/owner/repo.git`
//!
//! The `.git` suffix is optional in both forms.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// SSH or HTTPS GitHub remote URL.
static GITHUB_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:git@github\.com:|https://github\.com/)([^/\s]+/[^/\s]+?)(?:\.git)?$").unwrap()
});

/// VCS lookup error.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// No git repository contains the directory.
    #[error("Not inside a git repository: {0}")]
    Discover(#[source] Box<gix::discover::Error>),
    /// The repository has no URL for the remote.
    #[error("Git remote '{0}' has no URL configured")]
    RemoteNotFound(String),
    /// The remote URL does not point at a GitHub repository.
    #[error("Can't figure local repo from remote URL {0}")]
    UnrecognizedRemote(String),
}

/// Extract `owner/repo` from a GitHub remote URL.
///
/// Surrounding whitespace is ignored.
///
/// # Example
///
/// ```
/// use relnotes_vcs::parse_remote_url;
///
/// assert_eq!(
///     parse_remote_url("git@github.com:firebase/firebase-ios-sdk.git").unwrap(),
///     "firebase/firebase-ios-sdk"
/// );
/// assert!(parse_remote_url("https://gitlab.com/org/repo.git").is_err());
/// ```
pub fn parse_remote_url(url: &str) -> Result<String, VcsError> {
    let url = url.trim();
    GITHUB_REMOTE
        .captures(url)
        .map(|caps| caps[1].to_owned())
        .ok_or_else(|| VcsError::UnrecognizedRemote(url.to_owned()))
}

/// URL of `remote` in the git repository containing `dir`.
pub fn remote_url(dir: &Path, remote: &str) -> Result<String, VcsError> {
    let repo = gix::discover(dir).map_err(|e| VcsError::Discover(Box::new(e)))?;
    let key = format!("remote.{remote}.url");
    let url = repo
        .config_snapshot()
        .string(key.as_str())
        .map(|value| value.to_string())
        .ok_or_else(|| VcsError::RemoteNotFound(remote.to_owned()))?;

    tracing::debug!(remote, url = %url, "Found git remote");
    Ok(url)
}

/// Resolve the local GitHub repository (`owner/repo`) from a git remote.
///
/// # Errors
///
/// Fails when `dir` is not inside a git repository, when the remote has no
/// URL, or when the URL is not a GitHub SSH or HTTPS URL.
pub fn resolve_local_repo(dir: &Path, remote: &str) -> Result<String, VcsError> {
    parse_remote_url(&remote_url(dir, remote)?)
}
