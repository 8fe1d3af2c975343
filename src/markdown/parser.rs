//! Line-oriented markdown renderer.
//!
//! `render` is a single forward pass over `\n`-split lines (CRLF
//! normalized first). The parser keeps one accumulating buffer per
//! construct — paragraph, list, block quote, fenced code — and flushes
//! a buffer into a [`Block`] whenever a line fails that buffer's
//! continuation rule. The function is total: malformed or partial
//! syntax degrades to plain text or salvaged content, never an error.

use crate::markdown::block::{Block, HeadingLevel};
use crate::markdown::inline::{parse_inline, InlineSpan};

/// Render message text into a block sequence.
///
/// Deterministic, pure, and idempotent: the same input always yields a
/// structurally identical block tree. Never fails; an empty input
/// yields an empty sequence.
pub fn render(content: &str) -> Vec<Block> {
    let normalized = content.replace("\r\n", "\n");
    let mut parser = LineParser::default();
    for line in normalized.split('\n') {
        parser.feed_line(line);
    }
    parser.finish()
}

// ===== LineParser =====

/// List marker style. Switching style terminates the open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Debug)]
struct ListBuffer {
    kind: ListKind,
    items: Vec<String>,
}

#[derive(Debug)]
struct FenceBuffer {
    language: Option<String>,
    lines: Vec<String>,
}

/// Scanning state: at most one buffer is active after any line.
#[derive(Debug, Default)]
struct LineParser {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Option<ListBuffer>,
    quote: Vec<String>,
    fence: Option<FenceBuffer>,
}

impl LineParser {
    fn feed_line(&mut self, raw: &str) {
        if self.fence.is_some() {
            if raw.trim() == "```" {
                self.close_fence();
            } else if let Some(fence) = &mut self.fence {
                // Verbatim, never reprocessed by any other rule.
                fence.lines.push(raw.to_string());
            }
            return;
        }

        let trimmed = raw.trim();

        if trimmed.starts_with("```") {
            self.flush_all();
            // A fence line that also ends in backticks — a self-closing
            // one-liner or a run of four or more — neither opens nor
            // closes; the line is dropped.
            if trimmed.len() > 3 && trimmed.ends_with("```") {
                return;
            }
            let tag = trimmed[3..].trim();
            self.fence = Some(FenceBuffer {
                language: (!tag.is_empty()).then(|| tag.to_string()),
                lines: Vec::new(),
            });
            return;
        }

        if trimmed.is_empty() {
            self.flush_all();
            return;
        }

        if let Some((level, text)) = heading_line(raw) {
            self.flush_all();
            self.blocks.push(Block::Heading {
                level,
                spans: parse_inline(text),
            });
            return;
        }

        if let Some(rest) = quote_line(raw) {
            self.flush_list();
            self.quote.push(rest.to_string());
            return;
        }

        if let Some(item) = unordered_item(raw) {
            self.flush_quote();
            self.flush_paragraph();
            self.push_list_item(ListKind::Unordered, item);
            return;
        }

        if let Some(item) = ordered_item(raw) {
            self.flush_quote();
            self.flush_paragraph();
            self.push_list_item(ListKind::Ordered, item);
            return;
        }

        // Paragraph lines accumulate; only the other buffers flush.
        self.flush_list();
        self.flush_quote();
        self.paragraph.push(raw.to_string());
    }

    fn finish(mut self) -> Vec<Block> {
        // An unclosed fence still emits its accumulated content.
        self.close_fence();
        self.flush_all();
        self.blocks
    }

    fn push_list_item(&mut self, kind: ListKind, item: &str) {
        let same_kind = self.list.as_ref().is_some_and(|list| list.kind == kind);
        if !same_kind {
            self.flush_list();
            self.list = Some(ListBuffer {
                kind,
                items: Vec::new(),
            });
        }
        if let Some(list) = &mut self.list {
            list.items.push(item.to_string());
        }
    }

    /// Flush every pending buffer: list, then quote, then paragraph.
    fn flush_all(&mut self) {
        self.flush_list();
        self.flush_quote();
        self.flush_paragraph();
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        // Soft break: lines join with a single space, so inline markers
        // never pair across source lines.
        let text = std::mem::take(&mut self.paragraph).join(" ");
        self.blocks.push(Block::Paragraph {
            spans: parse_inline(&text),
        });
    }

    fn flush_quote(&mut self) {
        if self.quote.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.quote)
            .iter()
            .map(|line| parse_inline(line))
            .collect();
        self.blocks.push(Block::BlockQuote { lines });
    }

    fn flush_list(&mut self) {
        if let Some(list) = self.list.take() {
            let items: Vec<Vec<InlineSpan>> =
                list.items.iter().map(|item| parse_inline(item)).collect();
            self.blocks.push(match list.kind {
                ListKind::Unordered => Block::UnorderedList { items },
                ListKind::Ordered => Block::OrderedList { items },
            });
        }
    }

    fn close_fence(&mut self) {
        if let Some(fence) = self.fence.take() {
            self.blocks.push(Block::CodeBlock {
                language: fence.language,
                code: fence.lines.join("\n"),
            });
        }
    }
}

// ===== Line classification =====

/// Match `^(#{1,6})\s+(.*)$`.
fn heading_line(line: &str) -> Option<(HeadingLevel, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    let text = rest.trim_start();
    if text.len() == rest.len() {
        // No whitespace after the markers.
        return None;
    }
    let level = HeadingLevel::new(hashes as u8).ok()?;
    Some((level, text))
}

/// Match `^>\s?`, returning the remainder with the marker stripped.
fn quote_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    match rest.chars().next() {
        Some(c) if c.is_whitespace() => Some(&rest[c.len_utf8()..]),
        _ => Some(rest),
    }
}

/// Match `^[-*+]\s+`, returning the item text.
fn unordered_item(line: &str) -> Option<&str> {
    let marker = line.chars().next()?;
    if !matches!(marker, '-' | '*' | '+') {
        return None;
    }
    let rest = &line[marker.len_utf8()..];
    let item = rest.trim_start();
    if item.len() == rest.len() {
        return None;
    }
    Some(item)
}

/// Match `^\d+\.\s+`, returning the item text.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let item = rest.trim_start();
    if item.len() == rest.len() {
        return None;
    }
    Some(item)
}

// ===== Tests =====
