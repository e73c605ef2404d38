//! Tag classification tables.
//!
//! Every element the classifier visits is judged against three tables:
//!
//! - **span** tags: content, if parsed at all, gets span-level treatment only
//! - **block** tags: content may be parsed as full block-level Markdown
//! - **raw** tags: content is never parsed, whatever the attribute says
//!
//! The tables are configuration, not runtime state: a [`TagPolicy`] is built
//! once (from [`Default`] or deserialized from a host config file) and passed
//! by shared reference through a whole invocation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

const SPAN_TAGS: &[&str] = &[
    "address", "dd", "dt", "h1", "h2", "h3", "h4", "h5", "h6", "legend", "li", "p", "td", "th",
];

// `address` appears here *and* in the span table. The dual membership is
// deliberate: with `markdown="1"` it gets span treatment, with
// `markdown="block"` it still qualifies for a full block parse.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "colgroup",
    "details",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "header",
    "hr",
    "iframe",
    "main",
    "map",
    "menu",
    "nav",
    "noscript",
    "object",
    "ol",
    "section",
    "table",
    "tbody",
    "tfoot",
    "thead",
    "tr",
    "ul",
];

const RAW_TAGS: &[&str] = &[
    "canvas", "math", "option", "pre", "script", "style", "textarea",
];

/// The three tag tables driving per-element content treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPolicy {
    pub span_tags: BTreeSet<String>,
    pub block_tags: BTreeSet<String>,
    pub raw_tags: BTreeSet<String>,
}

impl TagPolicy {
    pub fn is_span(&self, tag: &str) -> bool {
        self.span_tags.contains(tag)
    }

    pub fn is_block(&self, tag: &str) -> bool {
        self.block_tags.contains(tag)
    }

    pub fn is_raw(&self, tag: &str) -> bool {
        self.raw_tags.contains(tag)
    }

    /// Membership in the union of all three tables.
    ///
    /// This is the "structural tag" set: an open `p` auto-closes when any of
    /// these opens inside it.
    pub fn is_known(&self, tag: &str) -> bool {
        self.is_span(tag) || self.is_block(tag) || self.is_raw(tag)
    }

    /// Tags whose content may be parsed at all (span ∪ block).
    pub fn is_parseable(&self, tag: &str) -> bool {
        self.is_span(tag) || self.is_block(tag)
    }
}

impl Default for TagPolicy {
    fn default() -> Self {
        fn set(tags: &[&str]) -> BTreeSet<String> {
            tags.iter().map(|t| t.to_string()).collect()
        }
        Self {
            span_tags: set(SPAN_TAGS),
            block_tags: set(BLOCK_TAGS),
            raw_tags: set(RAW_TAGS),
        }
    }
}
