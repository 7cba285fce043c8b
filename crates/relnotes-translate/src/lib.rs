//! Rule-based changelog translator with pluggable render backends.
//!
//! This crate rewrites a changelog section into release notes by running the
//! text through a fixed, ordered table of anchored match rules. Each match is
//! handed to a [`RenderBackend`], which decides how the construct looks in the
//! target format. Text that no rule recognizes is passed through unchanged.
//!
//! # Architecture
//!
//! - [`Translator`]: consumes the input left to right, one rule match at a time
//! - [`RuleKind`]: the closed set of constructs (heading, bullet, change type,
//!   URL, local issue link, plain text)
//! - [`RenderBackend`]: one method per construct
//! - [`DevsiteBackend`]: renders devsite release notes with `{{macro}}` tags
//!   and GitHub issue links
//!
//! # Example
//!
//! ```
//! use relnotes_translate::{DevsiteBackend, HeadingPolicy, Translator};
//!
//! let backend = DevsiteBackend::new("org/repo", HeadingPolicy::Replace("{{widgets}}".into()));
//! let notes = Translator::new(backend).translate("## 1.2.0\n- [added] Support for X (#12)\n");
//!
//! assert_eq!(
//!     notes,
//!     "### {{widgets}}\n* {{feature}} Support for X ([#12](//github.com/org/repo/issues/12))\n"
//! );
//! ```

mod backend;
mod devsite;
mod rules;
mod translator;

pub use backend::RenderBackend;
pub use devsite::{DevsiteBackend, HeadingPolicy, canonical_change_type};
pub use rules::RuleKind;
pub use translator::{Matches, RuleMatch, Translator};
