//! Changelog loading and section extraction.
//!
//! A changelog is a markdown file made of sections, each introduced by a
//! `#` heading that usually names a version:
//!
//! ```text
//! # Unreleased
//! - [fixed] Pending fix.
//!
//! # v1.2.0
//! - [added] Support for X (#12).
//! ```
//!
//! [`extract_section`] picks one section (heading plus body) so it can be
//! turned into release notes on its own.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// A heading line with a digit somewhere after the `#`.
static VERSIONED_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\D*\d").unwrap());

/// Changelog error.
#[derive(Debug, thiserror::Error)]
pub enum ChangelogError {
    /// The changelog could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// No heading mentions the requested version.
    #[error("No section for version {version} in {}", .path.display())]
    VersionNotFound { path: PathBuf, version: String },
    /// No heading carries a version number at all.
    #[error("No versioned section in {}", .path.display())]
    NoVersionedSection { path: PathBuf },
}

/// Extract one section from a changelog document.
///
/// Lines are skipped until the first heading that contains `version`, or, when
/// no version is given, the first heading with a digit in it. The section is
/// that heading and every following line up to the next heading, with
/// trailing blank lines removed.
///
/// Returns `None` when no heading qualifies.
///
/// # Example
///
/// ```
/// use relnotes_changelog::extract_section;
///
/// let changelog = "# Unreleased\n- wip\n\n# 1.1.0\n- [fixed] bug\n\n# 1.0.0\n- first\n";
/// assert_eq!(extract_section(changelog, None), Some("# 1.1.0\n- [fixed] bug\n"));
/// assert_eq!(extract_section(changelog, Some("1.0.0")), Some("# 1.0.0\n- first\n"));
/// ```
#[must_use]
pub fn extract_section<'a>(document: &'a str, version: Option<&str>) -> Option<&'a str> {
    let mut lines = document.split_inclusive('\n');

    let mut start = 0;
    loop {
        let line = lines.next()?;
        if is_section_start(line, version) {
            break;
        }
        start += line.len();
    }

    let rest = &document[start..];
    let mut section: Vec<&str> = rest.split_inclusive('\n').collect();
    if let Some(next_heading) = section.iter().skip(1).position(|line| line.starts_with('#')) {
        section.truncate(next_heading + 1);
    }
    while section.last().is_some_and(|line| is_blank(line)) {
        section.pop();
    }

    let len = section.iter().map(|line| line.len()).sum();
    Some(&rest[..len])
}

/// Whether `line` is the heading a section starts at.
fn is_section_start(line: &str, version: Option<&str>) -> bool {
    match version {
        Some(version) => line.starts_with('#') && line.contains(version),
        None => VERSIONED_HEADING.is_match(line),
    }
}

/// A line holding nothing but its line ending.
fn is_blank(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).is_empty()
}

/// Read a whole changelog.
pub fn read_document(path: &Path) -> Result<String, ChangelogError> {
    std::fs::read_to_string(path).map_err(|source| ChangelogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a changelog and extract one section from it.
///
/// See [`extract_section`] for how the section is chosen.
pub fn read_section(path: &Path, version: Option<&str>) -> Result<String, ChangelogError> {
    let document = read_document(path)?;
    let Some(section) = extract_section(&document, version) else {
        return Err(match version {
            Some(version) => ChangelogError::VersionNotFound {
                path: path.to_path_buf(),
                version: version.to_owned(),
            },
            None => ChangelogError::NoVersionedSection {
                path: path.to_path_buf(),
            },
        });
    };

    tracing::debug!(
        path = %path.display(),
        version = version.unwrap_or("latest"),
        lines = section.lines().count(),
        "Extracted changelog section"
    );
    Ok(section.to_owned())
}
