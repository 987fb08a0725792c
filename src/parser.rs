use std::borrow::Cow;
use std::iter::Peekable;

use crate::block::{Block, List, ListItem};
use crate::inline::{ALL_RULES, parse_inline};
use crate::marker::{self, MarkerKind};

/// Normalize CRLF line endings so blank-line detection sees `\n\n`
fn normalize_newlines(document: &str) -> Cow<'_, str> {
    if document.contains('\r') {
        Cow::Owned(document.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(document)
    }
}

/// Segment a document into blocks
pub fn parse(document: &str) -> Vec<Block> {
    let document = normalize_newlines(document);
    let mut cursor = Chunks::new(&document).peekable();
    let mut blocks = Vec::new();

    while let Some(chunk) = cursor.next() {
        segment_chunk(chunk, &mut cursor, &mut blocks);
    }

    log::debug!("segmented document into {} blocks", blocks.len());
    blocks
}

/// Trimmed, non-empty, blank-line separated chunks.
///
/// A chunk whose first line is a heading is split after that line, so a
/// heading always stands alone and the lines under it form their own chunk.
struct Chunks<'a> {
    raw: std::str::Split<'a, &'static str>,
    tail: Option<&'a str>,
}

impl<'a> Chunks<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            raw: document.split("\n\n"),
            tail: None,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let chunk = match self.tail.take() {
                Some(tail) => tail,
                None => self.raw.next()?.trim(),
            };
            if chunk.is_empty() {
                continue;
            }
            if let Some((first, rest)) = chunk.split_once('\n')
                && marker::heading(first.trim_end()).is_some()
            {
                self.tail = Some(rest.trim());
                return Some(first.trim_end());
            }
            return Some(chunk);
        }
    }
}

fn segment_chunk<'a, I>(chunk: &'a str, cursor: &mut Peekable<I>, blocks: &mut Vec<Block>)
where
    I: Iterator<Item = &'a str>,
{
    if let Some(heading) = marker::heading(chunk) {
        blocks.push(Block::Heading {
            level: heading.level,
            content: parse_inline(heading.text, ALL_RULES),
        });
        return;
    }

    let Some(kind) = classify(chunk) else {
        blocks.push(paragraph(chunk));
        return;
    };

    let mut list = ListBuilder::new(kind);
    let intro = list.absorb(chunk);
    if list.items.is_empty() {
        // Looked like a list but no line carried a usable marker
        blocks.push(paragraph(chunk));
        return;
    }
    if !intro.is_empty() {
        blocks.push(paragraph(&intro.join("\n")));
    }

    while let Some(next) = cursor.next_if(|next| list.continued_by(next)) {
        list.absorb(next);
    }

    log::trace!("list block: {:?} with {} items", kind, list.items.len());
    blocks.push(list.finish());
}

/// Decide whether a chunk is list-like, and of which family.
fn classify(chunk: &str) -> Option<MarkerKind> {
    if let Some(m) = marker::list_marker(chunk) {
        return Some(m.kind);
    }

    let mut bullets = 0;
    let mut numbers = 0;
    let mut lines = 0;
    for line in chunk.lines().map(str::trim) {
        lines += 1;
        match marker::list_marker(line).map(|m| m.kind) {
            Some(MarkerKind::Unordered) => bullets += 1,
            Some(MarkerKind::Ordered) => numbers += 1,
            None => {}
        }
    }

    if lines > 1 && bullets + numbers > 1 {
        // Ties go to unordered
        Some(if numbers > bullets {
            MarkerKind::Ordered
        } else {
            MarkerKind::Unordered
        })
    } else {
        None
    }
}

fn paragraph(text: &str) -> Block {
    Block::Paragraph {
        content: parse_inline(text, ALL_RULES),
    }
}

struct ListBuilder {
    kind: MarkerKind,
    items: Vec<String>,
}

impl ListBuilder {
    fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Collect the items of one chunk. Marker lines start items and other
    /// lines extend the last item; lines seen before any item are returned.
    fn absorb<'a>(&mut self, chunk: &'a str) -> Vec<&'a str> {
        let mut leading = Vec::new();
        for line in chunk.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(m) = marker::list_marker(line) {
                self.items.push(line[m.len..].trim().to_string());
            } else if let Some(last) = self.items.last_mut() {
                last.push(' ');
                last.push_str(line);
            } else {
                leading.push(line);
            }
        }
        leading
    }

    /// A following chunk continues this list only with a marker of the same family.
    fn continued_by(&self, chunk: &str) -> bool {
        marker::list_marker(chunk).is_some_and(|m| m.kind == self.kind)
    }

    fn finish(self) -> Block {
        let items = self
            .items
            .iter()
            .map(|item| ListItem {
                content: parse_inline(item, ALL_RULES),
            })
            .collect();
        Block::List(List {
            ordered: self.kind == MarkerKind::Ordered,
            items,
        })
    }
}
