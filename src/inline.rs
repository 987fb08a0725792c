//! Inline span recognition.
//!
//! Rules run in a fixed order, each over the spans left by earlier rules. A
//! span may open in one text leaf and close in a later sibling, in which case
//! everything in between becomes its content. Unmatched delimiters stay in the
//! text as literals.

use std::collections::VecDeque;

use crate::block::Span;

/// A family of inline spans, applied in slice order by [`parse_inline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `**text**` then `__text__`
    Bold,
    /// `*text*` then `_text_`
    Italic,
    /// `` `text` ``
    Code,
    /// `[label](target)`
    Link,
}

/// Every rule, in priority order.
pub const ALL_RULES: &[Rule] = &[Rule::Bold, Rule::Italic, Rule::Code, Rule::Link];

/// Links only, for content that carries no emphasis.
pub const LINK_RULES: &[Rule] = &[Rule::Link];

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Strong(char),
    Emphasis(char),
    Code,
    Link,
}

impl Rule {
    fn patterns(self) -> &'static [Pattern] {
        match self {
            Rule::Bold => &[Pattern::Strong('*'), Pattern::Strong('_')],
            Rule::Italic => &[Pattern::Emphasis('*'), Pattern::Emphasis('_')],
            Rule::Code => &[Pattern::Code],
            Rule::Link => &[Pattern::Link],
        }
    }
}

impl Pattern {
    /// The character that ends the inner text. It never occurs inside it.
    fn stop(self) -> char {
        match self {
            Pattern::Strong(delim) | Pattern::Emphasis(delim) => delim,
            Pattern::Code => '`',
            Pattern::Link => ']',
        }
    }

    /// Build the span from its content and the closing markup, which for a
    /// link carries the target as `](target)`.
    fn wrap(self, content: Vec<Span>, closer: &str) -> Span {
        match self {
            Pattern::Strong(_) => Span::Bold(content),
            Pattern::Emphasis(_) => Span::Italic(content),
            Pattern::Code => Span::Code(content),
            Pattern::Link => Span::Link {
                url: closer[2..closer.len() - 1].to_string(),
                content,
            },
        }
    }
}

/// A span opening in the current text leaf.
enum Found {
    /// Closes inside the same leaf.
    Within { start: usize, end: usize, span: Span },
    /// Closes in a later text sibling.
    Across {
        start: usize,
        inner_start: usize,
        close: Close,
    },
}

struct Close {
    /// Position of the closing leaf among the following siblings
    sibling: usize,
    leaf: String,
    at: usize,
    end: usize,
}

/// Parse a run of text into spans using the given rules.
pub fn parse_inline(text: &str, rules: &[Rule]) -> Vec<Span> {
    let mut spans = vec![Span::Text(text.to_string())];
    for pattern in rules.iter().flat_map(|rule| rule.patterns()) {
        spans = apply(spans, *pattern);
    }
    spans.retain(|span| !matches!(span, Span::Text(t) if t.is_empty()));
    spans
}

fn apply(spans: Vec<Span>, pattern: Pattern) -> Vec<Span> {
    let mut rest: VecDeque<Span> = spans
        .into_iter()
        .map(|span| descend(span, pattern))
        .collect();
    let mut out = Vec::with_capacity(rest.len());

    while let Some(span) = rest.pop_front() {
        match span {
            Span::Text(text) => split_text(&text, pattern, &mut rest, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn descend(span: Span, pattern: Pattern) -> Span {
    match span {
        Span::Text(_) => span,
        Span::Bold(children) => Span::Bold(apply(children, pattern)),
        Span::Italic(children) => Span::Italic(apply(children, pattern)),
        Span::Code(children) => Span::Code(apply(children, pattern)),
        Span::Link { url, content } => Span::Link {
            url,
            content: apply(content, pattern),
        },
    }
}

fn push_run(text: &str, out: &mut Vec<Span>) {
    if !text.is_empty() {
        out.push(Span::Text(text.to_string()));
    }
}

fn split_text(text: &str, pattern: Pattern, rest: &mut VecDeque<Span>, out: &mut Vec<Span>) {
    let mut cursor = 0;
    while let Some(found) = find(text, cursor, pattern, rest) {
        match found {
            Found::Within { start, end, span } => {
                push_run(&text[cursor..start], out);
                out.push(span);
                cursor = end;
            }
            Found::Across {
                start,
                inner_start,
                close,
            } => {
                push_run(&text[cursor..start], out);

                let mut content = Vec::new();
                push_run(&text[inner_start..], &mut content);
                content.extend(rest.drain(..close.sibling));
                // The closing leaf itself, kept in `close.leaf`
                rest.pop_front();
                push_run(&close.leaf[..close.at], &mut content);
                out.push(pattern.wrap(content, &close.leaf[close.at..close.end]));

                // Whatever follows the closer is scanned as its own leaf
                if close.end < close.leaf.len() {
                    rest.push_front(Span::Text(close.leaf[close.end..].to_string()));
                }
                return;
            }
        }
    }
    push_run(&text[cursor..], out);
}

fn find(text: &str, from: usize, pattern: Pattern, rest: &VecDeque<Span>) -> Option<Found> {
    text[from..]
        .char_indices()
        .map(|(offset, _)| from + offset)
        .find_map(|start| {
            let inner_start = open(text, start, pattern)?;
            match text[inner_start..].find(pattern.stop()) {
                Some(0) => None,
                Some(len) => {
                    let inner_end = inner_start + len;
                    let end = close(text, inner_end, pattern)?;
                    let inner = vec![Span::Text(text[inner_start..inner_end].to_string())];
                    Some(Found::Within {
                        start,
                        end,
                        span: pattern.wrap(inner, &text[inner_end..end]),
                    })
                }
                None => {
                    let close = close_in_siblings(rest, pattern, inner_start < text.len())?;
                    Some(Found::Across {
                        start,
                        inner_start,
                        close,
                    })
                }
            }
        })
}

/// Find the closer in the first following text leaf that holds the stop
/// character. The span fails if nothing would end up inside it.
fn close_in_siblings(rest: &VecDeque<Span>, pattern: Pattern, has_inner: bool) -> Option<Close> {
    for (sibling, span) in rest.iter().enumerate() {
        let Span::Text(leaf) = span else {
            continue;
        };
        let Some(at) = leaf.find(pattern.stop()) else {
            continue;
        };
        if !has_inner && sibling == 0 && at == 0 {
            return None;
        }
        let end = close(leaf, at, pattern)?;
        return Some(Close {
            sibling,
            leaf: leaf.clone(),
            at,
            end,
        });
    }
    None
}

/// Where the inner text starts, if an opening delimiter sits at `start`.
fn open(text: &str, start: usize, pattern: Pattern) -> Option<usize> {
    let before = char_before(text, start);
    match pattern {
        Pattern::Strong(delim) => {
            let opens = doubled_at(text, start, delim) && !flanks_word(before, delim);
            opens.then(|| start + delim.len_utf8() * 2)
        }
        Pattern::Emphasis(delim) => {
            let inner_start = start + delim.len_utf8();
            let opens = char_at(text, start) == Some(delim)
                && before != Some(delim)
                && !flanks_word(before, delim)
                && char_at(text, inner_start) != Some(delim);
            opens.then_some(inner_start)
        }
        Pattern::Code => (char_at(text, start) == Some('`')).then_some(start + 1),
        Pattern::Link => (char_at(text, start) == Some('[')).then_some(start + 1),
    }
}

/// Where the closing markup ends, if it starts at `at`. The caller has
/// already found the stop character there.
fn close(text: &str, at: usize, pattern: Pattern) -> Option<usize> {
    match pattern {
        Pattern::Strong(delim) => {
            let end = at + delim.len_utf8() * 2;
            let closes = doubled_at(text, at, delim) && !flanks_word(char_at(text, end), delim);
            closes.then_some(end)
        }
        Pattern::Emphasis(delim) => {
            let end = at + delim.len_utf8();
            let after = char_at(text, end);
            (after != Some(delim) && !flanks_word(after, delim)).then_some(end)
        }
        Pattern::Code => Some(at + 1),
        Pattern::Link => {
            if !text[at..].starts_with("](") {
                return None;
            }
            let url_start = at + 2;
            let url_end = url_start + run_until(text, url_start, ')')?;
            (char_at(text, url_end) == Some(')')).then_some(url_end + 1)
        }
    }
}

/// Length of the non-empty run of characters other than `stop` at `from`.
fn run_until(text: &str, from: usize, stop: char) -> Option<usize> {
    let len = text[from..].find(stop).unwrap_or(text.len() - from);
    (len > 0).then_some(len)
}

fn char_before(text: &str, at: usize) -> Option<char> {
    text[..at].chars().next_back()
}

fn char_at(text: &str, at: usize) -> Option<char> {
    text[at..].chars().next()
}

fn doubled_at(text: &str, at: usize, delim: char) -> bool {
    let mut chars = text[at..].chars();
    chars.next() == Some(delim) && chars.next() == Some(delim)
}

/// Underscore delimiters only count at word boundaries, so identifiers like
/// `snake_case_name` and URLs like `/a_b_c` keep their underscores.
fn flanks_word(c: Option<char>, delim: char) -> bool {
    delim == '_' && c.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    fn all(s: &str) -> Vec<Span> {
        parse_inline(s, ALL_RULES)
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(all("just words"), vec![text("just words")]);
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(all("").is_empty());
    }

    #[test]
    fn bold_both_delimiters() {
        assert_eq!(
            all("**a** and __b__"),
            vec![
                Span::Bold(vec![text("a")]),
                text(" and "),
                Span::Bold(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn bold_is_not_read_as_nested_italic() {
        assert_eq!(all("**IaaS**: desc"), vec![Span::Bold(vec![text("IaaS")]), text(": desc")]);
    }

    #[test]
    fn italic_both_delimiters() {
        assert_eq!(
            all("*a* or _b_"),
            vec![
                Span::Italic(vec![text("a")]),
                text(" or "),
                Span::Italic(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn unterminated_markers_stay_literal() {
        assert_eq!(all("**open and *half"), vec![text("**open and *half")]);
        assert_eq!(all("`tick"), vec![text("`tick")]);
        assert_eq!(all("[label](no close"), vec![text("[label](no close")]);
    }

    #[test]
    fn underscores_inside_words_stay_literal() {
        assert_eq!(all("snake_case_name"), vec![text("snake_case_name")]);
        assert_eq!(all("x__y__z"), vec![text("x__y__z")]);
        assert_eq!(
            all("[docs](https://x.y/a_b_c)"),
            vec![Span::Link {
                url: "https://x.y/a_b_c".to_string(),
                content: vec![text("docs")],
            }]
        );
    }

    #[test]
    fn code_span() {
        assert_eq!(
            all("run `cargo build` now"),
            vec![text("run "), Span::Code(vec![text("cargo build")]), text(" now")]
        );
    }

    #[test]
    fn link_span() {
        assert_eq!(
            all("see [Gcore CDN](https://gcore.com/cdn)."),
            vec![
                text("see "),
                Span::Link {
                    url: "https://gcore.com/cdn".to_string(),
                    content: vec![text("Gcore CDN")],
                },
                text("."),
            ]
        );
    }

    #[test]
    fn later_rules_reach_inside_bold() {
        assert_eq!(
            all("**[x](u)**"),
            vec![Span::Bold(vec![Span::Link {
                url: "u".to_string(),
                content: vec![text("x")],
            }])]
        );
    }

    #[test]
    fn later_rules_reach_inside_code() {
        assert_eq!(
            all("`[x](u)`"),
            vec![Span::Code(vec![Span::Link {
                url: "u".to_string(),
                content: vec![text("x")],
            }])]
        );
    }

    #[test]
    fn link_label_wraps_bold() {
        assert_eq!(
            all("[**Gcore CDN**](https://gcore.com/cdn) is fast"),
            vec![
                Span::Link {
                    url: "https://gcore.com/cdn".to_string(),
                    content: vec![Span::Bold(vec![text("Gcore CDN")])],
                },
                text(" is fast"),
            ]
        );
    }

    #[test]
    fn italic_wraps_bold() {
        assert_eq!(
            all("*a **b** c* and *d*"),
            vec![
                Span::Italic(vec![text("a "), Span::Bold(vec![text("b")]), text(" c")]),
                text(" and "),
                Span::Italic(vec![text("d")]),
            ]
        );
    }

    #[test]
    fn code_wraps_bold() {
        assert_eq!(
            all("`a **b** c`"),
            vec![Span::Code(vec![text("a "), Span::Bold(vec![text("b")]), text(" c")])]
        );
    }

    #[test]
    fn span_can_cross_several_siblings() {
        assert_eq!(
            all("[**a** and `b`](u)"),
            vec![Span::Link {
                url: "u".to_string(),
                content: vec![
                    Span::Bold(vec![text("a")]),
                    text(" and "),
                    Span::Code(vec![text("b")]),
                ],
            }]
        );
    }

    #[test]
    fn unclosed_delimiter_around_bold_stays_literal() {
        assert_eq!(
            all("*a **b** c"),
            vec![text("*a "), Span::Bold(vec![text("b")]), text(" c")]
        );
        assert_eq!(
            all("[**a**] (u)"),
            vec![text("["), Span::Bold(vec![text("a")]), text("] (u)")]
        );
    }

    #[test]
    fn link_rules_ignore_emphasis() {
        assert_eq!(
            parse_inline("**a** [b](c)", LINK_RULES),
            vec![
                text("**a** "),
                Span::Link {
                    url: "c".to_string(),
                    content: vec![text("b")],
                },
            ]
        );
    }

    #[test]
    fn multibyte_text_around_markers() {
        assert_eq!(
            all("café *résumé* ✓"),
            vec![text("café "), Span::Italic(vec![text("résumé")]), text(" ✓")]
        );
    }
}
