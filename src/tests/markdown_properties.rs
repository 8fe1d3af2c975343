//! Property-based tests for the markdown renderer.
//!
//! The renderer's contract is totality: for all input strings it
//! terminates, never panics, and yields a deterministic block tree.
//! Lenience is a contract, not an omission, so these properties run
//! over arbitrary strings, not just well-formed markdown.

use crate::markdown::block::Block;
use crate::markdown::render;
use proptest::prelude::*;

/// Lines that cannot collide with any block marker or fence.
fn arb_plain_line() -> impl Strategy<Value = String> {
    "[a-z]{1,20}"
}

/// Fence bodies: printable text with no backticks.
fn arb_fence_body_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 .,_-]{0,40}", 1..8)
}

proptest! {
    #[test]
    fn render_terminates_and_never_panics(content in any::<String>()) {
        let _ = render(&content);
    }

    #[test]
    fn render_is_deterministic(content in any::<String>()) {
        prop_assert_eq!(render(&content), render(&content));
    }

    #[test]
    fn fenced_text_is_preserved_verbatim(lines in arb_fence_body_lines()) {
        let body = lines.join("\n");
        let source = format!("```\n{body}\n```");
        let blocks = render(&source);

        prop_assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::CodeBlock { language, code } => {
                prop_assert_eq!(language, &None);
                prop_assert_eq!(code, &body);
            }
            other => prop_assert!(false, "expected code block, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_fence_salvages_every_line(lines in arb_fence_body_lines()) {
        let body = lines.join("\n");
        let source = format!("```rust\n{body}");
        let blocks = render(&source);

        prop_assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::CodeBlock { language, code } => {
                prop_assert_eq!(language.as_deref(), Some("rust"));
                prop_assert_eq!(code, &body);
            }
            other => prop_assert!(false, "expected code block, got {other:?}"),
        }
    }

    #[test]
    fn blank_separated_lines_become_one_paragraph_each(
        texts in prop::collection::vec(arb_plain_line(), 1..6)
    ) {
        let source = texts.join("\n\n");
        let blocks = render(&source);

        prop_assert_eq!(blocks.len(), texts.len());
        for block in &blocks {
            prop_assert!(matches!(block, Block::Paragraph { .. }));
        }
    }

    #[test]
    fn unordered_items_collect_into_one_list(
        items in prop::collection::vec(arb_plain_line(), 1..6)
    ) {
        let source = items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = render(&source);

        prop_assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::UnorderedList { items: parsed } => {
                prop_assert_eq!(parsed.len(), items.len());
            }
            other => prop_assert!(false, "expected unordered list, got {other:?}"),
        }
    }
}
