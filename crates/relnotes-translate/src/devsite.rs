//! Devsite backend for release notes rendering.
//!
//! Produces devsite-flavored markdown: change type tags and product names
//! become `{{macro}}` references, bullets use `*`, and GitHub issue references
//! become scheme-relative markdown links.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::backend::RenderBackend;

/// Link to a GitHub issue: `[https:]//github.com/<owner/repo>/issues/<number>`.
static ISSUE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https:)?(//github\.com/(.*)/issues/(\d+))$").unwrap()
});

/// What to do with the section heading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HeadingPolicy {
    /// Emit the heading line as written.
    #[default]
    Passthrough,
    /// Drop the heading entirely.
    Suppress,
    /// Replace the heading with `### <token>`, e.g. `### {{firestore}}`.
    Replace(String),
}

/// Map a change type tag to its devsite macro name.
///
/// Unknown tags map to themselves.
///
/// ```
/// use relnotes_translate::canonical_change_type;
///
/// assert_eq!(canonical_change_type("added"), "feature");
/// assert_eq!(canonical_change_type("fixed"), "fixed");
/// ```
#[must_use]
pub fn canonical_change_type(tag: &str) -> &str {
    match tag {
        "added" => "feature",
        other => other,
    }
}

/// Devsite render backend.
///
/// Holds the local repository (`owner/repo`), which decides how issue links
/// are labelled and where `(#123)` references point, and the heading policy.
#[derive(Debug, Clone)]
pub struct DevsiteBackend {
    local_repo: String,
    heading: HeadingPolicy,
}

impl DevsiteBackend {
    /// Create a backend for the given local repository and heading policy.
    #[must_use]
    pub fn new(local_repo: impl Into<String>, heading: HeadingPolicy) -> Self {
        Self {
            local_repo: local_repo.into(),
            heading,
        }
    }

    /// The local repository as `owner/repo`.
    #[must_use]
    pub fn local_repo(&self) -> &str {
        &self.local_repo
    }

    /// What happens to heading lines.
    #[must_use]
    pub fn heading_policy(&self) -> &HeadingPolicy {
        &self.heading
    }
}

impl RenderBackend for DevsiteBackend {
    fn heading(&self, line: &str, out: &mut String) {
        match &self.heading {
            HeadingPolicy::Passthrough => out.push_str(line),
            HeadingPolicy::Suppress => {}
            HeadingPolicy::Replace(token) => writeln!(out, "### {token}").unwrap(),
        }
    }

    /// All bulleted lists in devsite are `*` style.
    fn bullet(&self, indent: &str, out: &mut String) {
        out.push_str(indent);
        out.push_str("* ");
    }

    fn change_type(&self, tag: &str, out: &mut String) {
        write!(out, "{{{{{}}}}}", canonical_change_type(tag)).unwrap();
    }

    fn url(&self, url: &str, out: &mut String) {
        let Some(caps) = ISSUE_URL_PATTERN.captures(url) else {
            out.push_str(url);
            return;
        };
        let link = &caps[1];
        let repo = &caps[2];
        let issue = &caps[3];

        if repo == self.local_repo {
            write!(out, "[#{issue}]({link})").unwrap();
        } else {
            write!(out, "[{repo}#{issue}]({link})").unwrap();
        }
    }

    fn local_issue_link(&self, issue: &str, out: &mut String) {
        write!(
            out,
            "([#{issue}](//github.com/{}/issues/{issue}))",
            self.local_repo
        )
        .unwrap();
    }
}
