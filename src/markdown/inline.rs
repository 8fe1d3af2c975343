//! Inline span model and tokenizer.
//!
//! Inline parsing is an ordered alternation over the remaining text:
//! bold, then italic (`*` or `_`), then inline code, then link. The
//! earliest match in the text wins; at the same position the priority
//! order breaks the tie. Closing delimiters are lazy (the first
//! candidate that leaves non-empty content). Anything that never forms
//! a complete pair is emitted literally — the tokenizer has no failure
//! mode.

// ===== InlineSpan =====

/// Inline node within a block's text.
///
/// Bold and italic own their children, so nesting (including nested
/// emphasis) is plain recursive ownership. Code and link contents are
/// literal and never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    /// Literal text run.
    PlainText(String),
    /// Strong emphasis (`**...**`); children are inline-parsed.
    Bold(Vec<InlineSpan>),
    /// Emphasis (`*...*` or `_..._`); children are inline-parsed.
    Italic(Vec<InlineSpan>),
    /// Inline code (`` `...` ``); contents taken literally.
    InlineCode(String),
    /// Link (`[label](href)`); both parts taken literally.
    Link {
        /// Visible link text.
        label: String,
        /// Link target, unvalidated.
        href: String,
    },
}

// ===== Tokenizer =====

/// A matched inline token: byte range in the scanned text plus the
/// parsed span.
struct Token {
    start: usize,
    end: usize,
    span: InlineSpan,
}

/// Parse inline markup into a span sequence.
///
/// Total over all inputs: unmatched or malformed markers fall through
/// to plain text. An empty input yields an empty sequence.
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match next_token(rest) {
            Some(token) => {
                if token.start > 0 {
                    spans.push(InlineSpan::PlainText(rest[..token.start].to_string()));
                }
                spans.push(token.span);
                rest = &rest[token.end..];
            }
            None => {
                spans.push(InlineSpan::PlainText(rest.to_string()));
                break;
            }
        }
    }

    spans
}

/// Find the earliest token in `text`, trying each pattern in priority
/// order at every position.
fn next_token(text: &str) -> Option<Token> {
    for (at, _) in text.char_indices() {
        if let Some(token) = token_at(text, at) {
            return Some(token);
        }
    }
    None
}

/// Try each token pattern at a single byte position.
fn token_at(text: &str, at: usize) -> Option<Token> {
    let rest = &text[at..];

    if rest.starts_with("**") {
        // Lazy closer: first `**` leaving at least one content byte.
        if let Some(close) = find_from(rest, "**", 3) {
            return Some(Token {
                start: at,
                end: at + close + 2,
                span: InlineSpan::Bold(parse_inline(&rest[2..close])),
            });
        }
    }
    if rest.starts_with('*') {
        if let Some(close) = find_from(rest, "*", 2) {
            return Some(Token {
                start: at,
                end: at + close + 1,
                span: InlineSpan::Italic(parse_inline(&rest[1..close])),
            });
        }
    }
    if rest.starts_with('_') {
        if let Some(close) = find_from(rest, "_", 2) {
            return Some(Token {
                start: at,
                end: at + close + 1,
                span: InlineSpan::Italic(parse_inline(&rest[1..close])),
            });
        }
    }
    if rest.starts_with('`') {
        if let Some(close) = find_from(rest, "`", 2) {
            return Some(Token {
                start: at,
                end: at + close + 1,
                span: InlineSpan::InlineCode(rest[1..close].to_string()),
            });
        }
    }
    if rest.starts_with('[') {
        if let Some(label_close) = find_from(rest, "]", 2) {
            if rest.as_bytes().get(label_close + 1) == Some(&b'(') {
                if let Some(href_close) = find_from(rest, ")", label_close + 3) {
                    return Some(Token {
                        start: at,
                        end: at + href_close + 1,
                        span: InlineSpan::Link {
                            label: rest[1..label_close].to_string(),
                            href: rest[label_close + 2..href_close].to_string(),
                        },
                    });
                }
            }
        }
    }

    None
}

/// Find `needle` in `haystack` at a byte index >= `from`.
///
/// Positions that are not char boundaries are skipped, so slicing at
/// the returned index is always valid.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let mut idx = from;
    while idx + needle.len() <= haystack.len() {
        if haystack.is_char_boundary(idx) && haystack[idx..].starts_with(needle) {
            return Some(idx);
        }
        idx += 1;
    }
    None
}

// ===== Tests =====
