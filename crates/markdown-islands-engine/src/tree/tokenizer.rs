//! Streaming markup tokenizer.
//!
//! A single left-to-right scan over the raw span, emitting events for tags,
//! text, references, and the opaque constructs (comments, processing
//! instructions, declarations). The scanner is permissive: nothing here ever
//! fails, and every malformed construct degrades to literal text or an
//! unterminated-to-end-of-input form.
//!
//! Tag and attribute names are restricted to ASCII `[A-Za-z0-9:_-]` and
//! lower-cased on emission. Entity and character references are *not*
//! resolved; they surface as [`Token::Reference`] carrying the literal
//! source text, and downstream consumers treat them as plain text.

use memchr::{memchr, memchr2};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// One event of the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        /// Attribute name → raw value; `None` for valueless attributes.
        attrs: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    /// An unresolved `&...;` reference, kept as literal source text.
    Reference(String),
    /// Complete raw source of a `<!-- -->` comment.
    Comment(String),
    /// Complete raw source of a `<?...>` processing instruction.
    ProcessingInstruction(String),
    /// Complete raw source of a `<!...>` or `<![...]>` declaration,
    /// well-formed or not.
    Declaration(String),
}

/// Elements whose content is scanned verbatim up to the matching close tag.
const RAWTEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that never take content and do not specify a closing tag.
pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Tokenize one raw markup span.
// Scanning is byte-wise, but slices are only ever cut at ASCII structural
// bytes or at scan positions reached through ASCII-only runs, so every slice
// endpoint is a UTF-8 char boundary.
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' && bytes[i] != b'&' {
            let start = i;
            i = match memchr2(b'<', b'&', &bytes[start..]) {
                Some(rel) => start + rel,
                None => len,
            };
            push_text(&mut out, &input[start..i]);
            continue;
        }

        if bytes[i] == b'&' {
            match scan_reference(bytes, i) {
                Some(end) => {
                    out.push(Token::Reference(input[i..end].to_string()));
                    i = end;
                }
                None => {
                    push_text(&mut out, "&");
                    i += 1;
                }
            }
            continue;
        }

        // bytes[i] == b'<'
        let rest = &input[i..];
        if rest.starts_with(COMMENT_START) {
            i = scan_delimited(
                input,
                i,
                COMMENT_START.len(),
                COMMENT_END,
                &mut out,
                Token::Comment,
            );
        } else if rest.starts_with("<![") {
            i = scan_delimited(input, i, 3, "]>", &mut out, Token::Declaration);
        } else if rest.starts_with("<!") {
            i = scan_delimited(input, i, 2, ">", &mut out, Token::Declaration);
        } else if rest.starts_with("<?") {
            i = scan_delimited(input, i, 2, ">", &mut out, Token::ProcessingInstruction);
        } else if rest.starts_with("</") && matches!(bytes.get(i + 2), Some(b) if b.is_ascii_alphabetic())
        {
            i = scan_end_tag(input, i, &mut out);
        } else if matches!(bytes.get(i + 1), Some(b) if b.is_ascii_alphabetic()) {
            i = scan_start_tag(input, i, &mut out);
        } else {
            // stray '<' that opens nothing
            push_text(&mut out, "<");
            i += 1;
        }
    }
    out
}

fn push_text(out: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Token::Text(text.to_string()));
    }
}

/// `&#123;`, `&#x1F;`, or `&name;`; returns the end offset past `;`.
fn scan_reference(bytes: &[u8], start: usize) -> Option<usize> {
    let len = bytes.len();
    let mut j = start + 1;
    if j >= len {
        return None;
    }
    if bytes[j] == b'#' {
        j += 1;
        let hex = matches!(bytes.get(j), Some(b'x' | b'X'));
        if hex {
            j += 1;
        }
        let digits = j;
        while j < len
            && (if hex {
                bytes[j].is_ascii_hexdigit()
            } else {
                bytes[j].is_ascii_digit()
            })
        {
            j += 1;
        }
        if j == digits {
            return None;
        }
    } else {
        if !bytes[j].is_ascii_alphabetic() {
            return None;
        }
        let name = j;
        while j < len && bytes[j].is_ascii_alphanumeric() {
            j += 1;
        }
        // longest real entity names are well under this
        if j - name > 32 {
            return None;
        }
    }
    if bytes.get(j) == Some(&b';') {
        Some(j + 1)
    } else {
        None
    }
}

/// Scan a construct running from `start` to the first `close` after the
/// opener; an unterminated construct extends to end of input. Emits the
/// complete raw source.
fn scan_delimited(
    input: &str,
    start: usize,
    opener_len: usize,
    close: &str,
    out: &mut Vec<Token>,
    make: impl FnOnce(String) -> Token,
) -> usize {
    let body = start + opener_len;
    let end = match input[body..].find(close) {
        Some(rel) => body + rel + close.len(),
        None => input.len(),
    };
    out.push(make(input[start..end].to_string()));
    end
}

fn scan_end_tag(input: &str, start: usize, out: &mut Vec<Token>) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut j = start + 2;
    let name_start = j;
    while j < len && is_name_byte(bytes[j]) {
        j += 1;
    }
    let name = input[name_start..j].to_ascii_lowercase();
    while j < len && bytes[j] != b'>' {
        j += 1;
    }
    if j < len {
        j += 1;
    }
    out.push(Token::EndTag { name });
    j
}

fn scan_start_tag(input: &str, start: usize, out: &mut Vec<Token>) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut j = start + 1;
    while j < len && is_name_byte(bytes[j]) {
        j += 1;
    }
    let name = input[start + 1..j].to_ascii_lowercase();

    let mut attrs: Vec<(String, Option<String>)> = Vec::new();
    let mut self_closing = false;
    loop {
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= len {
            break;
        }
        if bytes[j] == b'>' {
            j += 1;
            break;
        }
        if bytes[j] == b'/' {
            if j + 1 < len && bytes[j + 1] == b'>' {
                self_closing = true;
                j += 2;
                break;
            }
            j += 1;
            continue;
        }
        let attr_start = j;
        while j < len && is_name_byte(bytes[j]) {
            j += 1;
        }
        if attr_start == j {
            j += 1;
            continue;
        }
        let attr_name = input[attr_start..j].to_ascii_lowercase();

        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let value = if j < len && bytes[j] == b'=' {
            j += 1;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < len && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let quote = bytes[j];
                j += 1;
                let vstart = j;
                while j < len && bytes[j] != quote {
                    j += 1;
                }
                let raw = &input[vstart..j];
                if j < len {
                    j += 1;
                }
                Some(raw.to_string())
            } else {
                let vstart = j;
                while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                    if bytes[j] == b'/' && j + 1 < len && bytes[j + 1] == b'>' {
                        break;
                    }
                    j += 1;
                }
                Some(input[vstart..j].to_string())
            }
        } else {
            None
        };
        attrs.push((attr_name, value));
    }

    let rawtext = !self_closing && RAWTEXT_ELEMENTS.contains(&name.as_str());
    out.push(Token::StartTag {
        name: name.clone(),
        attrs,
        self_closing,
    });
    if !rawtext {
        return j;
    }

    // Rawtext content model: everything up to the matching close tag is one
    // verbatim text event; no tag or reference scanning inside. A missing
    // close tag consumes the rest of the input.
    match find_rawtext_close(&input[j..], &name) {
        Some((rel_start, rel_end)) => {
            push_rawtext(out, &input[j..j + rel_start], name);
            j + rel_end
        }
        None => {
            push_rawtext(out, &input[j..], name);
            len
        }
    }
}

fn push_rawtext(out: &mut Vec<Token>, raw: &str, name: String) {
    if !raw.is_empty() {
        out.push(Token::Text(raw.to_string()));
    }
    out.push(Token::EndTag { name });
}

/// Case-insensitive `</name`, optional ASCII whitespace, `>`. Returns the
/// relative (start, end) of the whole close tag.
fn find_rawtext_close(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let len = bytes.len();
    let n = name.len();
    let mut i = 0;
    while i < len {
        let rel = memchr(b'<', &bytes[i..])?;
        i += rel;
        if i + 2 + n > len {
            return None;
        }
        if bytes[i + 1] == b'/' && bytes[i + 2..i + 2 + n].eq_ignore_ascii_case(name.as_bytes()) {
            let mut k = i + 2 + n;
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}
