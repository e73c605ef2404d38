//! Raw-content stash.
//!
//! Comments, processing instructions, and declarations are not representable
//! as ordinary tree nodes, but they still have to survive classification in
//! document order. The builder stores their raw source text here and inserts
//! the returned placeholder token as inert leaf content; the host's restore
//! stage swaps tokens back for the stored text after rendering.
//!
//! A stash is scoped to one document-processing run and is always passed by
//! `&mut` reference. Concurrent runs use independent instances; the
//! exclusive borrow is what serializes writes.

use std::collections::HashMap;

/// Delimits placeholder tokens. Control characters cannot occur in ordinary
/// document text, so tokens never collide with content.
pub const TOKEN_START: char = '\u{2}';
/// Closing delimiter, see [`TOKEN_START`].
pub const TOKEN_END: char = '\u{3}';

const TOKEN_LABEL: &str = "mdislands";

/// Deduplicating append-only store for opaque markup spans.
#[derive(Debug, Default)]
pub struct RawStash {
    entries: Vec<String>,
    index_of: HashMap<String, usize>,
}

impl RawStash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` and return its placeholder token.
    ///
    /// Identical spans share one entry and one token; tokens are stable for
    /// the lifetime of the run.
    pub fn store(&mut self, text: &str) -> String {
        if let Some(&index) = self.index_of.get(text) {
            return Self::token(index);
        }
        let index = self.entries.len();
        self.entries.push(text.to_string());
        self.index_of.insert(text.to_string(), index);
        Self::token(index)
    }

    /// The placeholder token for entry `index`.
    pub fn token(index: usize) -> String {
        format!("{TOKEN_START}{TOKEN_LABEL}:{index}{TOKEN_END}")
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Resolve a placeholder token back to its stored text.
    pub fn lookup_token(&self, token: &str) -> Option<&str> {
        let inner = token.strip_prefix(TOKEN_START)?.strip_suffix(TOKEN_END)?;
        let index = inner.strip_prefix(TOKEN_LABEL)?.strip_prefix(':')?;
        self.get(index.parse::<usize>().ok()?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries, ready for the next run.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index_of.clear();
    }
}
