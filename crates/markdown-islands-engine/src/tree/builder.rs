//! Stack-based tree construction.
//!
//! Consumes the tokenizer's event stream and maintains an explicit stack of
//! open elements on top of a synthetic fragment root. Construction never
//! fails: unbalanced markup degrades through auto-closing, orphan-close
//! tolerance, and an end-of-scan flush of whatever is still open.

use log::{debug, trace};

use crate::policy::TagPolicy;
use crate::stash::RawStash;
use crate::tree::tokenizer::{self, Token};
use crate::tree::{Element, Text};

/// Build a tag tree from one raw markup span.
///
/// Comments, processing instructions, and declarations are stored in
/// `stash` and survive as synthetic `p` placeholders at their original
/// position. The returned root is the span's single top-level element when
/// there is one (surrounding whitespace permitting), otherwise the fragment
/// root itself.
pub fn build(raw: &str, stash: &mut RawStash, policy: &TagPolicy) -> Element {
    let mut builder = Builder::new();
    for token in tokenizer::tokenize(raw) {
        builder.push(token, stash, policy);
    }
    builder.finish()
}

struct Builder {
    root: Element,
    /// Open elements above the root, innermost last.
    stack: Vec<Element>,
}

impl Builder {
    fn new() -> Self {
        Self {
            root: Element::fragment(),
            stack: Vec::new(),
        }
    }

    fn push(&mut self, token: Token, stash: &mut RawStash, policy: &TagPolicy) {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => self.start_tag(name, attrs, self_closing, policy),
            Token::EndTag { name } => self.end_tag(name),
            Token::Text(text) | Token::Reference(text) => self.append_text(&text),
            Token::Comment(raw) | Token::ProcessingInstruction(raw) | Token::Declaration(raw) => {
                self.stash_opaque(&raw, stash)
            }
        }
    }

    fn start_tag(
        &mut self,
        name: String,
        attrs: Vec<(String, Option<String>)>,
        self_closing: bool,
        policy: &TagPolicy,
    ) {
        // A still-open paragraph closes when a structural tag opens inside it.
        if self.top().tag == "p" && policy.is_known(&name) {
            trace!("auto-closing <p> at start of <{name}>");
            self.close_top();
        }

        let mut el = Element::new(name);
        for (attr_name, value) in attrs {
            // valueless attributes normalize to `name="name"`
            let value = value.unwrap_or_else(|| attr_name.clone());
            el.attrs.insert(attr_name, value);
        }

        if self_closing || tokenizer::is_void_element(&el.tag) {
            self.attach(el);
        } else {
            self.stack.push(el);
        }
    }

    fn end_tag(&mut self, name: String) {
        match self.stack.iter().rposition(|el| el.tag == name) {
            Some(pos) => {
                // close everything above and including the match,
                // innermost first
                while self.stack.len() > pos {
                    self.close_top();
                }
            }
            None => {
                debug!("orphan close tag </{name}>, keeping an empty element");
                self.attach(Element::new(name));
            }
        }
    }

    fn append_text(&mut self, text: &str) {
        let top = self.top_mut();
        match top.children.last_mut() {
            Some(last) => last.tail.push_str(text),
            None => top.text.push_str(text),
        }
    }

    fn stash_opaque(&mut self, raw: &str, stash: &mut RawStash) {
        let token = stash.store(raw);
        let mut placeholder = Element::new("p");
        placeholder.text = Text::new(token);
        self.attach(placeholder);
    }

    fn top(&self) -> &Element {
        self.stack.last().unwrap_or(&self.root)
    }

    fn top_mut(&mut self) -> &mut Element {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn attach(&mut self, el: Element) {
        self.top_mut().children.push(el);
    }

    fn close_top(&mut self) {
        if let Some(el) = self.stack.pop() {
            self.top_mut().children.push(el);
        }
    }

    fn finish(mut self) -> Element {
        if !self.stack.is_empty() {
            debug!("{} unclosed tag(s) at end of input", self.stack.len());
        }
        while !self.stack.is_empty() {
            self.close_top();
        }
        unwrap_single_element(self.root)
    }
}

/// The contract-shaped case is one top-level element with nothing but
/// whitespace around it; unwrap to that element. Anything else keeps the
/// fragment root, which the classifier passes through transparently.
fn unwrap_single_element(mut fragment: Element) -> Element {
    let single = fragment.text.as_str().trim().is_empty()
        && fragment.children.len() == 1
        && fragment.children[0].tail.as_str().trim().is_empty();
    if single
        && let Some(mut root) = fragment.children.pop()
    {
        root.tail = Text::default();
        return root;
    }
    fragment
}
