use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;

use crate::block::{Block, List, Span};

/// Rendering target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Inline markdown becomes `<strong>`, `<em>`, `<code>` and `<a>`.
    #[default]
    Html,
    /// Block tags stay, inline markup is reduced to bare text.
    PlainDocument,
}

/// How spans are written out
#[derive(Debug, Clone, Copy)]
pub struct Emit {
    pub mode: Mode,
    pub escape: bool,
}

/// Convert blocks to markup, one block per line
pub fn blocks_to_html(blocks: &[Block], emit: Emit) -> String {
    let mut out = String::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_block(block, emit, &mut out);
    }

    out
}

/// Convert a run of spans to inline markup
pub fn spans_to_string(spans: &[Span], emit: Emit) -> String {
    let mut out = String::new();
    spans_to_html(spans, emit, &mut out);
    out
}

fn emit_block(block: &Block, emit: Emit, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            spans_to_html(content, emit, out);
            out.push_str(&format!("</h{level}>"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            spans_to_html(content, emit, out);
            out.push_str("</p>");
        }
        Block::List(list) => list_to_html(list, emit, out),
    }
}

fn list_to_html(list: &List, emit: Emit, out: &mut String) {
    let tag = if list.ordered { "ol" } else { "ul" };

    out.push_str(&format!("<{tag}>"));
    for item in &list.items {
        out.push_str("<li>");
        spans_to_html(&item.content, emit, out);
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
}

fn spans_to_html(spans: &[Span], emit: Emit, out: &mut String) {
    for span in spans {
        match emit.mode {
            Mode::Html => span_to_html(span, emit, out),
            Mode::PlainDocument => span_to_plain(span, emit, out),
        }
    }
}

fn push_text(text: &str, escape: bool, out: &mut String) {
    if escape {
        out.push_str(&encode_text(text));
    } else {
        out.push_str(text);
    }
}

fn span_to_html(span: &Span, emit: Emit, out: &mut String) {
    match span {
        Span::Text(text) => push_text(text, emit.escape, out),
        Span::Bold(inner) => {
            out.push_str("<strong>");
            spans_to_html(inner, emit, out);
            out.push_str("</strong>");
        }
        Span::Italic(inner) => {
            out.push_str("<em>");
            spans_to_html(inner, emit, out);
            out.push_str("</em>");
        }
        Span::Code(inner) => {
            out.push_str("<code>");
            spans_to_html(inner, emit, out);
            out.push_str("</code>");
        }
        Span::Link { url, content } => {
            out.push_str("<a href=\"");
            if emit.escape {
                out.push_str(&encode_double_quoted_attribute(url));
            } else {
                out.push_str(url);
            }
            out.push_str("\">");
            spans_to_html(content, emit, out);
            out.push_str("</a>");
        }
    }
}

fn span_to_plain(span: &Span, emit: Emit, out: &mut String) {
    match span {
        // Stray emphasis and code markers are dropped outright
        Span::Text(text) => {
            let bare: String = text.chars().filter(|c| !matches!(c, '*' | '`')).collect();
            push_text(&bare, emit.escape, out);
        }
        Span::Bold(inner) | Span::Italic(inner) | Span::Code(inner) => {
            spans_to_html(inner, emit, out)
        }
        Span::Link { content, .. } => spans_to_html(content, emit, out),
    }
}
