//! Host-side block parsing boundary.
//!
//! The classifier never parses Markdown itself: it hands lines to a
//! [`BlockParser`] and splices whatever children come back. Hosts embedding
//! this engine in a full document pipeline implement the trait with their own
//! grammar; [`LineParser`] is a reference grammar good enough for stand-alone
//! use, examples, and tests.

mod line_parser;

pub use line_parser::LineParser;

use thiserror::Error;

use crate::tree::Element;

/// Failure surfaced by a host block parser.
///
/// Nothing in this crate produces one. It exists so host grammars can abort
/// an invocation; classification propagates it unchanged rather than trying
/// to recover mid-splice.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("host block parser error: {0}")]
    Host(String),
}

/// Block-level structured-text parser contract.
pub trait BlockParser {
    /// Parse `lines` with the host grammar and append the resulting
    /// block-level elements as children of `owner`.
    ///
    /// `owner` is always a disposable scratch element; implementations must
    /// not inspect it beyond appending children.
    fn parse_blocks(&mut self, owner: &mut Element, lines: &[&str]) -> Result<(), BlockError>;
}
