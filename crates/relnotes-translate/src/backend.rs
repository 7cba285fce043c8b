//! Render backend trait for format-specific rendering.
//!
//! The translator only knows where a construct starts and ends; everything
//! about how it looks in the output is delegated to a backend.

/// Backend trait for format-specific rendering operations.
///
/// Each method receives the capture of one rule match and appends its
/// rendered form to `out`. Implementations provide rendering for:
/// - Headings (devsite replaces them with a product macro heading)
/// - Bullets (normalized to a single marker style)
/// - Change type tags like `[fixed]`
/// - Bare URLs
/// - Local issue references like `(#123)`
///
/// Plain text defaults to passthrough.
pub trait RenderBackend {
    /// Render a heading line.
    ///
    /// # Arguments
    ///
    /// * `line` - The raw heading line, including the `#` markers and the
    ///   trailing newline when the input has one
    /// * `out` - Output buffer to write to
    fn heading(&self, line: &str, out: &mut String);

    /// Render a bullet marker.
    ///
    /// `indent` is the whitespace preceding the marker. It may start with a
    /// newline when the bullet follows a previous line.
    fn bullet(&self, indent: &str, out: &mut String);

    /// Render a change type tag, given the word between the brackets.
    fn change_type(&self, tag: &str, out: &mut String);

    /// Render a bare URL.
    fn url(&self, url: &str, out: &mut String);

    /// Render a parenthesized local issue reference, given the issue number.
    fn local_issue_link(&self, issue: &str, out: &mut String);

    /// Render text no other rule recognized.
    ///
    /// Default implementation copies the text unchanged.
    fn text(&self, text: &str, out: &mut String) {
        out.push_str(text);
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for &B {
    fn heading(&self, line: &str, out: &mut String) {
        (**self).heading(line, out);
    }

    fn bullet(&self, indent: &str, out: &mut String) {
        (**self).bullet(indent, out);
    }

    fn change_type(&self, tag: &str, out: &mut String) {
        (**self).change_type(tag, out);
    }

    fn url(&self, url: &str, out: &mut String) {
        (**self).url(url, out);
    }

    fn local_issue_link(&self, issue: &str, out: &mut String) {
        (**self).local_issue_link(issue, out);
    }

    fn text(&self, text: &str, out: &mut String) {
        (**self).text(text, out);
    }
}
