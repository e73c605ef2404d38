//! Reference line-based block grammar.
//!
//! Two-phase parse: each line is classified on its own local facts, then a
//! small state machine folds the classified lines into elements. Covers
//! blank-separated paragraphs, ATX headings, and fenced code blocks; that is
//! enough grammar to exercise every splicing path of the classifier.

use crate::tree::{Element, Text};

use super::{BlockError, BlockParser};

/// Reference block parser over plain lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineParser;

impl BlockParser for LineParser {
    fn parse_blocks(&mut self, owner: &mut Element, lines: &[&str]) -> Result<(), BlockError> {
        let mut builder = LineBuilder::new();
        for line in lines {
            builder.push(line);
        }
        owner.children.extend(builder.finish());
        Ok(())
    }
}

/// Local facts about one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass<'a> {
    Blank,
    Heading { level: usize, text: &'a str },
    Fence { marker: char },
    Plain(&'a str),
}

fn classify_line(line: &str) -> LineClass<'_> {
    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    if let Some(heading) = heading_sig(line) {
        return heading;
    }
    if let Some(marker) = fence_sig(line) {
        return LineClass::Fence { marker };
    }
    LineClass::Plain(line)
}

/// `#`–`######` followed by a space (or nothing: an empty heading).
fn heading_sig(line: &str) -> Option<LineClass<'_>> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        Some(LineClass::Heading { level, text: "" })
    } else {
        rest.strip_prefix(' ').map(|text| LineClass::Heading {
            level,
            text: text.trim(),
        })
    }
}

fn fence_sig(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

#[derive(Debug)]
enum Leaf {
    None,
    Paragraph(Vec<String>),
    Fence { marker: char, code: Vec<String> },
}

struct LineBuilder {
    leaf: Leaf,
    out: Vec<Element>,
}

impl LineBuilder {
    fn new() -> Self {
        Self {
            leaf: Leaf::None,
            out: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        if let Leaf::Fence { marker, .. } = self.leaf {
            if fence_sig(line) == Some(marker) {
                self.flush();
            } else if let Leaf::Fence { code, .. } = &mut self.leaf {
                code.push(line.to_string());
            }
            return;
        }

        match classify_line(line) {
            LineClass::Blank => self.flush(),
            LineClass::Heading { level, text } => {
                self.flush();
                let mut heading = Element::new(format!("h{level}"));
                heading.text = Text::new(text);
                self.out.push(heading);
            }
            LineClass::Fence { marker } => {
                // opener line (info string included) is consumed here
                self.flush();
                self.leaf = Leaf::Fence {
                    marker,
                    code: Vec::new(),
                };
            }
            LineClass::Plain(text) => match &mut self.leaf {
                Leaf::Paragraph(lines) => lines.push(text.to_string()),
                _ => self.leaf = Leaf::Paragraph(vec![text.to_string()]),
            },
        }
    }

    fn flush(&mut self) {
        match std::mem::replace(&mut self.leaf, Leaf::None) {
            Leaf::None => {}
            Leaf::Paragraph(lines) => {
                let mut paragraph = Element::new("p");
                paragraph.text = Text::new(lines.join("\n"));
                self.out.push(paragraph);
            }
            // unterminated fences flush here at end of input too
            Leaf::Fence { code, .. } => {
                let mut body = code.join("\n");
                if !body.is_empty() {
                    body.push('\n');
                }
                let mut code_el = Element::new("code");
                code_el.text = Text::new(body);
                code_el.text.mark_atomic();
                let mut pre = Element::new("pre");
                pre.children.push(code_el);
                self.out.push(pre);
            }
        }
    }

    fn finish(mut self) -> Vec<Element> {
        self.flush();
        self.out
    }
}
