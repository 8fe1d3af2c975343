//! Syntax highlighting for fenced code blocks.
//!
//! Maps a code block's raw text to framework-neutral styled spans (24-bit
//! foreground plus font flags) using syntect with the two-face syntax and
//! theme bundles. The shell converts spans to whatever its widget toolkit
//! wants; nothing here depends on a UI framework.
//!
//! Unknown languages and highlight failures fall back to unstyled text,
//! matching the renderer's no-failure contract.

use crate::markdown::block::Block;
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::FontStyle;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use two_face::theme::{EmbeddedLazyThemeSet, EmbeddedThemeName};

/// Default highlight theme name.
pub const DEFAULT_THEME: &str = "base16-ocean-dark";

/// Theme names accepted in configuration.
pub const VALID_THEMES: &[&str] = &[
    "base16-ocean-dark",
    "base16-ocean-light",
    "dracula",
    "github",
    "gruvbox-dark",
    "gruvbox-light",
    "monokai",
    "nord",
    "one-half-dark",
    "one-half-light",
    "solarized-dark",
    "solarized-light",
    "zenburn",
];

static THEME_SET: LazyLock<EmbeddedLazyThemeSet> = LazyLock::new(two_face::theme::extra);
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(two_face::syntax::extra_newlines);

/// 24-bit RGB foreground colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Styled fragment of a highlighted code line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Fragment text, without the trailing newline.
    pub text: String,
    /// Foreground colour, `None` for unstyled fallback text.
    pub fg: Option<Rgb>,
    /// Bold font flag.
    pub bold: bool,
    /// Italic font flag.
    pub italic: bool,
    /// Underline font flag.
    pub underline: bool,
}

impl StyledSpan {
    fn unstyled(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fg: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

fn theme_by_name(name: &str) -> Option<EmbeddedThemeName> {
    match name {
        "base16-ocean-dark" => Some(EmbeddedThemeName::Base16OceanDark),
        "base16-ocean-light" => Some(EmbeddedThemeName::Base16OceanLight),
        "dracula" => Some(EmbeddedThemeName::Dracula),
        "github" => Some(EmbeddedThemeName::Github),
        "gruvbox-dark" => Some(EmbeddedThemeName::GruvboxDark),
        "gruvbox-light" => Some(EmbeddedThemeName::GruvboxLight),
        "monokai" => Some(EmbeddedThemeName::MonokaiExtended),
        "nord" => Some(EmbeddedThemeName::Nord),
        "one-half-dark" => Some(EmbeddedThemeName::OneHalfDark),
        "one-half-light" => Some(EmbeddedThemeName::OneHalfLight),
        "solarized-dark" => Some(EmbeddedThemeName::SolarizedDark),
        "solarized-light" => Some(EmbeddedThemeName::SolarizedLight),
        "zenburn" => Some(EmbeddedThemeName::Zenburn),
        _ => None,
    }
}

/// Check whether a theme name is accepted in configuration.
pub fn is_valid_theme(name: &str) -> bool {
    theme_by_name(name).is_some()
}

// ===== CodeHighlighter =====

/// Code-block highlighter with a fixed theme.
pub struct CodeHighlighter {
    theme: EmbeddedThemeName,
}

impl CodeHighlighter {
    /// Create a highlighter for the named theme.
    ///
    /// Unknown names fall back to [`DEFAULT_THEME`].
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: theme_by_name(theme_name).unwrap_or(EmbeddedThemeName::Base16OceanDark),
        }
    }

    /// Highlight raw code, one span row per source line.
    pub fn highlight(&self, code: &str, language: Option<&str>) -> Vec<Vec<StyledSpan>> {
        let syntax = language
            .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
        let theme = THEME_SET.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut rows = Vec::new();
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(fragments) => {
                    let spans = fragments
                        .into_iter()
                        .filter_map(|(style, text)| {
                            let text = text.trim_end_matches('\n');
                            if text.is_empty() {
                                return None;
                            }
                            Some(StyledSpan {
                                text: text.to_string(),
                                fg: Some(Rgb {
                                    r: style.foreground.r,
                                    g: style.foreground.g,
                                    b: style.foreground.b,
                                }),
                                bold: style.font_style.contains(FontStyle::BOLD),
                                italic: style.font_style.contains(FontStyle::ITALIC),
                                underline: style.font_style.contains(FontStyle::UNDERLINE),
                            })
                        })
                        .collect();
                    rows.push(spans);
                }
                Err(_) => rows.push(vec![StyledSpan::unstyled(line.trim_end_matches('\n'))]),
            }
        }
        rows
    }

    /// Highlight a [`Block::CodeBlock`]; `None` for any other block.
    pub fn highlight_block(&self, block: &Block) -> Option<Vec<Vec<StyledSpan>>> {
        match block {
            Block::CodeBlock { language, code } => {
                Some(self.highlight(code, language.as_deref()))
            }
            _ => None,
        }
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

// ===== Tests =====
