//! Match rule catalog.
//!
//! Every rule is anchored to the start of the remaining text and consumes at
//! least one character when it matches. The table order is the priority
//! order: the first rule that matches at the cursor wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::backend::RenderBackend;

/// `#` at the start of a line, through the end of the line.
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[^\n]*\n?").unwrap());

/// Leading whitespace, one list marker, one space.
static BULLET_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s*)[*+-] ").unwrap());

/// A bracketed single word. The "not followed by `(`" half is checked by hand.
static CHANGE_TYPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\w+)\]").unwrap());

/// A bare URL, not ending in trailing punctuation.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^https?://[^\s<]+[^<.,:;"')\]\s]"#).unwrap());

/// `(#1234)`.
static LOCAL_ISSUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(#(\d+)\)").unwrap());

/// Characters and sequences where plain text stops so other rules get a chance.
static TEXT_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[\n]|https?://").unwrap());

/// Kind of construct a rule recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// A `#` heading line.
    Heading,
    /// A `*`, `+` or `-` list marker.
    Bullet,
    /// A `[word]` change type tag.
    ChangeType,
    /// A bare `http(s)://` URL.
    Url,
    /// A `(#123)` issue reference.
    LocalIssueLink,
    /// Anything else.
    Text,
}

impl RuleKind {
    /// Rule name as used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Bullet => "bullet",
            Self::ChangeType => "change_type",
            Self::Url => "url",
            Self::LocalIssueLink => "local_issue_link",
            Self::Text => "text",
        }
    }

    /// Dispatch a capture to the backend method for this kind.
    pub(crate) fn render<B: RenderBackend + ?Sized>(
        self,
        backend: &B,
        capture: &str,
        out: &mut String,
    ) {
        match self {
            Self::Heading => backend.heading(capture, out),
            Self::Bullet => backend.bullet(capture, out),
            Self::ChangeType => backend.change_type(capture, out),
            Self::Url => backend.url(capture, out),
            Self::LocalIssueLink => backend.local_issue_link(capture, out),
            Self::Text => backend.text(capture, out),
        }
    }
}

/// Position in the input: the unconsumed text and whether it begins a line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'t> {
    pub(crate) rest: &'t str,
    pub(crate) at_line_start: bool,
}

/// A successful rule application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Match<'t> {
    /// Number of bytes consumed from the cursor. Never zero.
    pub(crate) len: usize,
    /// Part of the span handed to the backend.
    pub(crate) capture: &'t str,
}

/// A rule: which construct it recognizes and how to match it.
pub(crate) struct Rule {
    pub(crate) kind: RuleKind,
    pub(crate) matcher: for<'t> fn(Cursor<'t>) -> Option<Match<'t>>,
}

/// All rules in priority order. `Text` is last and matches any non-empty input.
pub(crate) static RULES: [Rule; 6] = [
    Rule {
        kind: RuleKind::Heading,
        matcher: match_heading,
    },
    Rule {
        kind: RuleKind::Bullet,
        matcher: match_bullet,
    },
    Rule {
        kind: RuleKind::ChangeType,
        matcher: match_change_type,
    },
    Rule {
        kind: RuleKind::Url,
        matcher: match_url,
    },
    Rule {
        kind: RuleKind::LocalIssueLink,
        matcher: match_local_issue_link,
    },
    Rule {
        kind: RuleKind::Text,
        matcher: match_text,
    },
];

fn match_heading(cursor: Cursor<'_>) -> Option<Match<'_>> {
    if !cursor.at_line_start {
        return None;
    }
    let m = HEADING_PATTERN.find(cursor.rest)?;
    Some(Match {
        len: m.end(),
        capture: m.as_str(),
    })
}

fn match_bullet(cursor: Cursor<'_>) -> Option<Match<'_>> {
    let caps = BULLET_PATTERN.captures(cursor.rest)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    // Whitespace containing a newline carries the bullet onto a fresh line.
    if !cursor.at_line_start && !indent.contains('\n') {
        return None;
    }
    Some(Match {
        len: caps.get(0)?.end(),
        capture: indent,
    })
}

fn match_change_type(cursor: Cursor<'_>) -> Option<Match<'_>> {
    let caps = CHANGE_TYPE_PATTERN.captures(cursor.rest)?;
    let end = caps.get(0)?.end();
    // `[text](url)` is a link, not a tag.
    if cursor.rest[end..].starts_with('(') {
        return None;
    }
    Some(Match {
        len: end,
        capture: caps.get(1)?.as_str(),
    })
}

fn match_url(cursor: Cursor<'_>) -> Option<Match<'_>> {
    let m = URL_PATTERN.find(cursor.rest)?;
    Some(Match {
        len: m.end(),
        capture: m.as_str(),
    })
}

fn match_local_issue_link(cursor: Cursor<'_>) -> Option<Match<'_>> {
    let caps = LOCAL_ISSUE_PATTERN.captures(cursor.rest)?;
    Some(Match {
        len: caps.get(0)?.end(),
        capture: caps.get(1)?.as_str(),
    })
}

/// Consume the first character unconditionally, then run to the next boundary.
///
/// A newline is always a span of its own so the next line starts fresh.
fn match_text(cursor: Cursor<'_>) -> Option<Match<'_>> {
    let first = cursor.rest.chars().next()?;
    if first == '\n' {
        return Some(Match {
            len: 1,
            capture: &cursor.rest[..1],
        });
    }
    let first = first.len_utf8();
    let len = TEXT_BOUNDARY
        .find(&cursor.rest[first..])
        .map_or(cursor.rest.len(), |m| first + m.start());
    Some(Match {
        len,
        capture: &cursor.rest[..len],
    })
}
