//! Content classification.
//!
//! A recursive walk over a built tree deciding, per element, whether its
//! textual content is parsed as block-level Markdown, span-level Markdown
//! only, or left untouched. The decision combines the element's own
//! `markdown` attribute (consumed here, never visible downstream), its tag's
//! table membership, and a restriction inherited from its ancestors, which
//! only ever narrows, never widens.

use crate::blocks::{BlockError, BlockParser};
use crate::policy::TagPolicy;
use crate::tree::Element;

/// The literal attribute key consumed during classification.
pub const MARKDOWN_ATTR: &str = "markdown";

/// Restriction an ancestor imposes on its whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// Span-level parsing at most.
    SpanOnly,
    /// No parsing at all.
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Treatment {
    Block,
    Span,
    Off,
}

/// Classify `el` and its subtree in place.
///
/// Call with `restriction = None` on a tree root. Each node is visited
/// exactly once; the walk strictly descends, so it always terminates. The
/// only failure that can surface is the host block parser's own error, which
/// propagates unchanged.
pub fn classify(
    el: &mut Element,
    restriction: Option<Restriction>,
    policy: &TagPolicy,
    parser: &mut dyn BlockParser,
) -> Result<(), BlockError> {
    if el.is_fragment() {
        // transparent: no attribute of its own, no narrowing
        for child in &mut el.children {
            classify(child, restriction, policy, parser)?;
        }
        return Ok(());
    }

    let own = consume_attr(el);
    let effective = resolve(own, restriction);

    match treatment(&effective, &el.tag, policy) {
        Treatment::Block => classify_block(el, policy, parser),
        Treatment::Span => {
            // text and tails stay untouched for the host's inline stage
            for child in &mut el.children {
                classify(child, Some(Restriction::SpanOnly), policy, parser)?;
            }
            Ok(())
        }
        Treatment::Off => {
            el.text.mark_atomic();
            for child in &mut el.children {
                classify(child, Some(Restriction::Off), policy, parser)?;
                child.tail.mark_atomic();
            }
            Ok(())
        }
    }
}

/// Remove the `markdown` attribute and normalize it: absent means `"0"`,
/// the valueless form (stored as `markdown="markdown"`) means `"1"`.
fn consume_attr(el: &mut Element) -> String {
    match el.attrs.remove(MARKDOWN_ATTR) {
        Some(value) if value == MARKDOWN_ATTR => "1".to_string(),
        Some(value) => value,
        None => "0".to_string(),
    }
}

/// Narrow the node's own value by the inherited restriction.
fn resolve(own: String, restriction: Option<Restriction>) -> String {
    match restriction {
        Some(Restriction::Off) => "0".to_string(),
        Some(Restriction::SpanOnly) if own != "0" => "span".to_string(),
        _ => own,
    }
}

fn treatment(effective: &str, tag: &str, policy: &TagPolicy) -> Treatment {
    match effective {
        "block" if policy.is_parseable(tag) => Treatment::Block,
        "span" if policy.is_parseable(tag) => Treatment::Span,
        // span membership is checked first, so dual-membership tags
        // (`address`) resolve to span under "1"
        "1" if policy.is_span(tag) => Treatment::Span,
        "1" if policy.is_block(tag) => Treatment::Block,
        _ => Treatment::Off,
    }
}

fn classify_block(
    el: &mut Element,
    policy: &TagPolicy,
    parser: &mut dyn BlockParser,
) -> Result<(), BlockError> {
    // Children first: a block parse imposes no restriction on descendants.
    for child in &mut el.children {
        classify(child, None, policy, parser)?;
    }

    // Tails next. Parsing a tail adds siblings, so insertion points are
    // collected against the current child list and applied in descending
    // order to keep earlier indices valid.
    let mut insertions: Vec<(usize, Vec<Element>)> = Vec::new();
    for (pos, child) in el.children.iter_mut().enumerate() {
        if child.tail.is_empty() {
            continue;
        }
        let tail = child.tail.take();
        insertions.push((pos + 1, parse_lines(&tail, parser)?));
    }
    for (pos, nodes) in insertions.into_iter().rev() {
        el.children.splice(pos..pos, nodes);
    }

    // Own leading text last, spliced in front of every existing child.
    if !el.text.is_empty() {
        let text = el.text.take();
        let nodes = parse_lines(&text, parser)?;
        el.children.splice(0..0, nodes);
    }
    Ok(())
}

fn parse_lines(text: &str, parser: &mut dyn BlockParser) -> Result<Vec<Element>, BlockError> {
    let block = text.trim_end_matches('\n');
    let lines: Vec<&str> = block.split('\n').collect();
    let mut scratch = Element::new("div");
    parser.parse_blocks(&mut scratch, &lines)?;
    Ok(scratch.children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::LineParser;
    use crate::tree::Text;
    use pretty_assertions::assert_eq;

    fn classified(mut el: Element) -> Element {
        classify(&mut el, None, &TagPolicy::default(), &mut LineParser).unwrap();
        el
    }

    fn el_with_text(tag: &str, text: &str) -> Element {
        let mut el = Element::new(tag);
        el.text = Text::new(text);
        el
    }

    #[test]
    fn missing_attribute_defaults_to_no_parse() {
        let mut div = el_with_text("div", "raw *text*");
        let mut child = el_with_text("p", "inner");
        child.tail = Text::new("tail");
        div.children.push(child);

        let div = classified(div);
        assert!(div.text.is_atomic());
        assert_eq!(div.children.len(), 1);
        assert!(div.children[0].text.is_atomic());
        assert!(div.children[0].tail.is_atomic());
    }

    #[test]
    fn attribute_is_consumed() {
        let mut div = el_with_text("div", "x");
        div.set_attr(MARKDOWN_ATTR, "1");
        let div = classified(div);
        assert_eq!(div.attr(MARKDOWN_ATTR), None);
    }

    #[test]
    fn block_value_on_span_tag_still_block_parses() {
        let mut p = el_with_text("p", "a\n\nb");
        p.set_attr(MARKDOWN_ATTR, "block");
        let p = classified(p);
        assert!(p.text.is_empty());
        let texts: Vec<&str> = p.children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["a", "b"]);
    }

    #[test]
    fn span_ancestor_narrows_block_descendant() {
        let mut div = Element::new("div");
        div.set_attr(MARKDOWN_ATTR, "span");
        let mut quote = el_with_text("blockquote", "wants block");
        quote.set_attr(MARKDOWN_ATTR, "block");
        div.children.push(quote);

        let div = classified(div);
        let quote = &div.children[0];
        // narrowed to span: no block parse, text untouched and not atomic
        assert_eq!(quote.text.as_str(), "wants block");
        assert!(!quote.text.is_atomic());
        assert!(quote.children.is_empty());
        assert_eq!(quote.attr(MARKDOWN_ATTR), None);
    }

    #[test]
    fn off_ancestor_silences_whole_subtree() {
        let mut div = el_with_text("div", "top");
        let mut inner = el_with_text("div", "inner");
        inner.set_attr(MARKDOWN_ATTR, "1");
        div.children.push(inner);

        let div = classified(div);
        assert!(div.text.is_atomic());
        assert!(div.children[0].text.is_atomic());
        assert!(div.children[0].children.is_empty());
    }

    #[test]
    fn explicit_zero_under_span_ancestor_stays_off() {
        let mut div = Element::new("div");
        div.set_attr(MARKDOWN_ATTR, "span");
        let mut child = el_with_text("p", "quiet");
        child.set_attr(MARKDOWN_ATTR, "0");
        div.children.push(child);

        let div = classified(div);
        assert!(div.children[0].text.is_atomic());
    }

    #[test]
    fn tail_splice_then_text_preserves_document_order() {
        let mut div = el_with_text("div", "a\nb");
        div.set_attr(MARKDOWN_ATTR, "1");
        let mut child = el_with_text("p", "orig");
        child.tail = Text::new("c\nd");
        div.children.push(child);

        let div = classified(div);
        let texts: Vec<&str> = div.children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["a\nb", "orig", "c\nd"]);
        // existing child got the default no-parse treatment
        assert!(div.children[1].text.is_atomic());
        // parsed-in siblings are fresh and unrestricted
        assert!(!div.children[0].text.is_atomic());
        assert!(!div.children[2].text.is_atomic());
    }

    #[test]
    fn every_tail_splices_after_its_own_child() {
        let mut div = Element::new("div");
        div.set_attr(MARKDOWN_ATTR, "1");
        let mut first = el_with_text("p", "one");
        first.tail = Text::new("after one");
        let mut second = el_with_text("p", "two");
        second.tail = Text::new("after two");
        div.children.push(first);
        div.children.push(second);

        let div = classified(div);
        let texts: Vec<&str> = div.children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["one", "after one", "two", "after two"]);
    }

    #[test]
    fn valueless_attribute_counts_as_one() {
        // the builder normalizes `<div markdown>` to markdown="markdown"
        let mut div = el_with_text("div", "parsed");
        div.set_attr(MARKDOWN_ATTR, MARKDOWN_ATTR);
        let div = classified(div);
        assert!(div.text.is_empty());
        assert_eq!(div.children[0].tag, "p");
        assert_eq!(div.children[0].text.as_str(), "parsed");
    }

    #[test]
    fn address_is_span_under_one_and_block_under_block() {
        let mut address = el_with_text("address", "a\n\nb");
        address.set_attr(MARKDOWN_ATTR, "1");
        let address = classified(address);
        assert_eq!(address.text.as_str(), "a\n\nb");
        assert!(address.children.is_empty());

        let mut address = el_with_text("address", "a\n\nb");
        address.set_attr(MARKDOWN_ATTR, "block");
        let address = classified(address);
        assert!(address.text.is_empty());
        assert_eq!(address.children.len(), 2);
    }

    #[test]
    fn raw_tags_never_parse_regardless_of_attribute() {
        let mut script = el_with_text("script", "# not markdown");
        script.set_attr(MARKDOWN_ATTR, "1");
        let script = classified(script);
        assert!(script.text.is_atomic());
        assert!(script.children.is_empty());
    }

    #[test]
    fn unknown_tag_and_unknown_value_fall_back_to_no_parse() {
        let widget = classified(el_with_text("widget", "x"));
        assert!(widget.text.is_atomic());

        let mut div = el_with_text("div", "x");
        div.set_attr(MARKDOWN_ATTR, "yes");
        let div = classified(div);
        assert!(div.text.is_atomic());
    }

    #[test]
    fn fragment_root_is_transparent() {
        let mut fragment = Element::fragment();
        let mut island = el_with_text("div", "# h");
        island.set_attr(MARKDOWN_ATTR, "1");
        fragment.children.push(island);
        fragment.children.push(el_with_text("p", "plain"));

        let fragment = classified(fragment);
        assert_eq!(fragment.children[0].children[0].tag, "h1");
        assert!(fragment.children[1].text.is_atomic());
    }

    #[test]
    fn block_parse_resets_restriction_for_existing_children() {
        // an unrestricted child with its own markdown="1" inside a block
        // parse gets the full treatment
        let mut div = Element::new("div");
        div.set_attr(MARKDOWN_ATTR, "1");
        let mut inner = el_with_text("div", "# deep");
        inner.set_attr(MARKDOWN_ATTR, "1");
        div.children.push(inner);

        let div = classified(div);
        assert_eq!(div.children[0].children[0].tag, "h1");
    }

    #[test]
    fn parser_errors_propagate_unchanged() {
        struct Failing;
        impl BlockParser for Failing {
            fn parse_blocks(
                &mut self,
                _owner: &mut Element,
                _lines: &[&str],
            ) -> Result<(), BlockError> {
                Err(BlockError::Host("boom".to_string()))
            }
        }

        let mut div = el_with_text("div", "x");
        div.set_attr(MARKDOWN_ATTR, "1");
        let err = classify(&mut div, None, &TagPolicy::default(), &mut Failing).unwrap_err();
        assert!(matches!(err, BlockError::Host(msg) if msg == "boom"));
    }
}
