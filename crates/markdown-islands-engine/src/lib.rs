//! Selective Markdown parsing inside raw HTML blocks.
//!
//! A Markdown host pipeline that tolerates raw HTML needs an answer for the
//! text *inside* that HTML: is it more Markdown, or opaque markup? This
//! engine answers per element. It rebuilds a raw markup span into a tag
//! tree (surviving unbalanced tags, comments, processing instructions, and
//! declarations), then walks the tree applying the `markdown` attribute and
//! the tag policy tables to decide, node by node, between a full block-level
//! parse, span-level parsing only, or no parsing at all.
//!
//! # Modules
//!
//! - [`tree`]: tag tree model, tokenizer, and stack-based builder
//! - [`classify`]: the recursive content classifier
//! - [`policy`]: span/block/raw tag tables ([`TagPolicy`])
//! - [`blocks`]: the [`BlockParser`] host contract and a reference grammar
//! - [`stash`]: raw-content stash for opaque constructs
//!
//! # Example
//!
//! ```
//! use markdown_islands_engine::{LineParser, RawStash, TagPolicy, run};
//!
//! let mut stash = RawStash::new();
//! let policy = TagPolicy::default();
//! let tree = run(
//!     "<div markdown=\"1\">\n# Title\n\nSome text.\n</div>",
//!     &mut stash,
//!     &policy,
//!     &mut LineParser,
//! )
//! .unwrap();
//!
//! assert_eq!(tree.tag, "div");
//! assert_eq!(tree.children[0].tag, "h1");
//! assert_eq!(tree.children[1].text.as_str(), "Some text.");
//! ```

pub mod blocks;
pub mod classify;
pub mod policy;
pub mod stash;
pub mod tree;

pub use blocks::{BlockError, BlockParser, LineParser};
pub use classify::{MARKDOWN_ATTR, Restriction, classify};
pub use policy::TagPolicy;
pub use stash::RawStash;
pub use tree::{Element, FRAGMENT_TAG, Text, build, outline};

/// Build and fully classify a tree from one raw-markup span.
///
/// This is the sole operation a host pipeline calls per span: the tree comes
/// back classified, with every `markdown` attribute consumed and all opaque
/// constructs stashed. The caller owns the returned tree; the engine keeps
/// no state of its own between invocations.
///
/// The only error that can surface is `parser`'s own failure, which aborts
/// the invocation without returning a partial tree.
pub fn run(
    raw: &str,
    stash: &mut RawStash,
    policy: &TagPolicy,
    parser: &mut dyn BlockParser,
) -> Result<Element, BlockError> {
    let mut root = tree::build(raw, stash, policy);
    classify::classify(&mut root, None, policy, parser)?;
    Ok(root)
}
