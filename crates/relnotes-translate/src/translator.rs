//! Translation loop.
//!
//! The input is consumed left to right. At each position the rules are tried
//! in priority order and the first match wins; its span is removed from the
//! input and its capture is rendered by the backend. The plain text rule
//! matches any non-empty input, so every step consumes at least one character
//! and the loop always terminates.

use std::iter::FusedIterator;

use crate::backend::RenderBackend;
use crate::rules::{Cursor, RULES, RuleKind};

/// One step of a translation: the rule that fired and what it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    /// Rule that matched.
    pub kind: RuleKind,
    /// Full span consumed from the input.
    pub span: &'t str,
    /// Part of the span passed to the backend (tag word, URL, issue number, ...).
    pub capture: &'t str,
}

/// Iterator over the rule matches of a text, in input order.
///
/// Concatenating every [`RuleMatch::span`] reproduces the input exactly.
///
/// ```
/// use relnotes_translate::{Matches, RuleKind};
///
/// let kinds: Vec<_> = Matches::new("- [fixed] crash").map(|m| m.kind).collect();
/// assert_eq!(kinds, [RuleKind::Bullet, RuleKind::ChangeType, RuleKind::Text]);
/// ```
#[derive(Debug, Clone)]
pub struct Matches<'t> {
    rest: &'t str,
    at_line_start: bool,
}

impl<'t> Matches<'t> {
    /// Start matching at the beginning of `text`.
    #[must_use]
    pub fn new(text: &'t str) -> Self {
        Self {
            rest: text,
            at_line_start: true,
        }
    }
}

impl<'t> Iterator for Matches<'t> {
    type Item = RuleMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let cursor = Cursor {
            rest: self.rest,
            at_line_start: self.at_line_start,
        };
        // The text rule closes the table and matches any non-empty input.
        let (kind, m) = RULES
            .iter()
            .find_map(|rule| (rule.matcher)(cursor).map(|m| (rule.kind, m)))?;
        debug_assert!(m.len > 0, "{} rule matched an empty span", kind.name());

        let (span, rest) = self.rest.split_at(m.len);
        self.rest = rest;
        self.at_line_start = span.ends_with('\n');

        Some(RuleMatch {
            kind,
            span,
            capture: m.capture,
        })
    }
}

impl FusedIterator for Matches<'_> {}

/// Rewrites text by rendering every rule match through a backend.
///
/// # Example
///
/// ```
/// use relnotes_translate::{DevsiteBackend, HeadingPolicy, Translator};
///
/// let translator = Translator::new(DevsiteBackend::new("org/repo", HeadingPolicy::Suppress));
/// assert_eq!(translator.translate("# 2.0\n+ (#7)"), "* ([#7](//github.com/org/repo/issues/7))");
/// ```
#[derive(Debug, Clone)]
pub struct Translator<B> {
    backend: B,
}

impl<B: RenderBackend> Translator<B> {
    /// Create a translator rendering through `backend`.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend matches are rendered through.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Rule matches of `text`, without rendering.
    #[must_use]
    pub fn matches<'t>(&self, text: &'t str) -> Matches<'t> {
        Matches::new(text)
    }

    /// Translate `text`, leaving anything no rule recognizes unchanged.
    #[must_use]
    pub fn translate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut count = 0usize;

        for m in Matches::new(text) {
            tracing::trace!(rule = m.kind.name(), span = ?m.span, "Rule matched");
            m.kind.render(&self.backend, m.capture, &mut out);
            count += 1;
        }

        tracing::debug!(
            input_len = text.len(),
            output_len = out.len(),
            matches = count,
            "Translated text"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::devsite::{DevsiteBackend, HeadingPolicy};

    fn devsite(heading: HeadingPolicy) -> Translator<DevsiteBackend> {
        Translator::new(DevsiteBackend::new("org/repo", heading))
    }

    /// Wraps every construct in `<kind:capture>` to expose the dispatch.
    struct Tagging;

    impl RenderBackend for Tagging {
        fn heading(&self, line: &str, out: &mut String) {
            out.push_str(&format!("<heading:{line}>"));
        }

        fn bullet(&self, indent: &str, out: &mut String) {
            out.push_str(&format!("<bullet:{indent}>"));
        }

        fn change_type(&self, tag: &str, out: &mut String) {
            out.push_str(&format!("<change_type:{tag}>"));
        }

        fn url(&self, url: &str, out: &mut String) {
            out.push_str(&format!("<url:{url}>"));
        }

        fn local_issue_link(&self, issue: &str, out: &mut String) {
            out.push_str(&format!("<issue:{issue}>"));
        }
    }

    #[test]
    fn test_end_to_end_release_notes() {
        let translator = devsite(HeadingPolicy::Replace("{{widgets}}".to_owned()));
        assert_eq!(
            translator.translate("## 1.2.0\n- [added] Support for X (#12)\n"),
            "### {{widgets}}\n* {{feature}} Support for X ([#12](//github.com/org/repo/issues/12))\n"
        );
    }

    #[test]
    fn test_heading_passthrough() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(
            translator.translate("# v1.0.1\n- [fixed] Crash on start.\n"),
            "# v1.0.1\n* {{fixed}} Crash on start.\n"
        );
    }

    #[test]
    fn test_heading_suppressed_leaves_no_blank_line() {
        let translator = devsite(HeadingPolicy::Suppress);
        assert_eq!(
            translator.translate("# 6.0.0\n- [changed] Something.\n"),
            "* {{changed}} Something.\n"
        );
    }

    #[test]
    fn test_later_headings_suppressed() {
        let translator = devsite(HeadingPolicy::Suppress);
        assert_eq!(translator.translate("- x\n# B\n- y\n"), "* x\n* y\n");
        assert_eq!(translator.translate("# A\n# B\n- y\n"), "* y\n");
        assert_eq!(translator.translate("# A\n\n# B\n- y\n"), "\n* y\n");
    }

    #[test]
    fn test_later_headings_replaced() {
        let translator = devsite(HeadingPolicy::Replace("{{w}}".to_owned()));
        assert_eq!(
            translator.translate("# 2.0\n- x\n# 1.0\n- y\n"),
            "### {{w}}\n* x\n### {{w}}\n* y\n"
        );
    }

    #[test]
    fn test_heading_after_body_line_segmentation() {
        let segments: Vec<_> = Matches::new("- x\n# B\n")
            .map(|m| (m.kind, m.span))
            .collect();
        assert_eq!(
            segments,
            vec![
                (RuleKind::Bullet, "- "),
                (RuleKind::Text, "x"),
                (RuleKind::Text, "\n"),
                (RuleKind::Heading, "# B\n"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(devsite(HeadingPolicy::Passthrough).translate(""), "");
        assert_eq!(Matches::new("").count(), 0);
    }

    #[test]
    fn test_bullet_normalization() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(
            translator.translate("* a\n+ b\n  - c\n\t* d\n"),
            "* a\n* b\n  * c\n\t* d\n"
        );
    }

    #[test]
    fn test_dash_after_tag_is_not_a_bullet() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(translator.translate("[fixed] - x"), "{{fixed}} - x");
    }

    #[test]
    fn test_link_text_is_not_a_tag() {
        let translator = devsite(HeadingPolicy::Passthrough);
        let input = "- See [fixed](https://example.com) for details.\n";
        assert_eq!(
            translator.translate(input),
            "* See [fixed](https://example.com) for details.\n"
        );
    }

    #[test]
    fn test_issue_url_inside_parentheses() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(
            translator.translate("- Fixed crash (https://github.com/other/repo/issues/3).\n"),
            "* Fixed crash ([other/repo#3](//github.com/other/repo/issues/3)).\n"
        );
    }

    #[test]
    fn test_local_issue_url() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(
            translator.translate("see https://github.com/org/repo/issues/42, thanks"),
            "see [#42](//github.com/org/repo/issues/42), thanks"
        );
    }

    #[test]
    fn test_plain_url_unchanged() {
        let translator = devsite(HeadingPolicy::Passthrough);
        let input = "Docs at https://firebase.google.com/docs/firestore.";
        assert_eq!(translator.translate(input), input);
    }

    #[test]
    fn test_parenthesized_aside_unchanged() {
        let translator = devsite(HeadingPolicy::Passthrough);
        let input = "Faster queries (up to 2x) and [two words] (#abc)";
        assert_eq!(translator.translate(input), input);
    }

    #[test]
    fn test_multiple_issue_references() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(
            translator.translate("- [fixed] A (#1) (#22)"),
            "* {{fixed}} A ([#1](//github.com/org/repo/issues/1)) \
             ([#22](//github.com/org/repo/issues/22))"
        );
    }

    #[test]
    fn test_non_ascii_text() {
        let translator = devsite(HeadingPolicy::Passthrough);
        assert_eq!(
            translator.translate("- [added] Überarbeitet — naïve (#5)"),
            "* {{feature}} Überarbeitet — naïve ([#5](//github.com/org/repo/issues/5))"
        );
    }

    #[test]
    fn test_dispatch_to_custom_backend() {
        let translator = Translator::new(Tagging);
        assert_eq!(
            translator.translate("# T\n- [x] https://a.b/c (#9) y"),
            "<heading:# T\n><bullet:><change_type:x> <url:https://a.b/c> <issue:9> y"
        );
    }

    #[test]
    fn test_borrowed_backend() {
        let backend = DevsiteBackend::new("org/repo", HeadingPolicy::Suppress);
        let translator = Translator::new(&backend);
        assert_eq!(translator.translate("# 1.0\n"), "");
        assert_eq!(translator.backend().local_repo(), "org/repo");
    }

    #[test]
    fn test_matches_segmentation() {
        let translator = devsite(HeadingPolicy::Passthrough);
        let segments: Vec<_> = translator
            .matches("## 1.2.0\n- [added] X (#12)\n")
            .map(|m| (m.kind, m.span, m.capture))
            .collect();
        assert_eq!(
            segments,
            vec![
                (RuleKind::Heading, "## 1.2.0\n", "## 1.2.0\n"),
                (RuleKind::Bullet, "- ", ""),
                (RuleKind::ChangeType, "[added]", "added"),
                (RuleKind::Text, " X ", " X "),
                (RuleKind::LocalIssueLink, "(#12)", "12"),
                (RuleKind::Text, "\n", "\n"),
            ]
        );
    }

    #[test]
    fn test_matches_is_fused() {
        let mut matches = Matches::new("x");
        assert!(matches.next().is_some());
        assert!(matches.next().is_none());
        assert!(matches.next().is_none());
    }

    proptest! {
        #[test]
        fn prop_spans_cover_input(text in any::<String>()) {
            let joined: String = Matches::new(&text).map(|m| m.span).collect();
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn prop_markup_spans_cover_input(text in "[#*+\\-\\[\\]()a-z0-9 \n\t:/.]{0,200}") {
            let joined: String = Matches::new(&text).map(|m| m.span).collect();
            prop_assert_eq!(&joined, &text);
            prop_assert!(Matches::new(&text).all(|m| !m.span.is_empty()));
        }

        #[test]
        fn prop_trigger_free_text_unchanged(text in "[a-zA-Z0-9 .,;:!?'\n]{0,200}") {
            let translator = devsite(HeadingPolicy::Suppress);
            prop_assert_eq!(translator.translate(&text), text);
        }
    }
}
