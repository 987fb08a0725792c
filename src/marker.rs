//! Line-level marker recognition.
//!
//! Every predicate anchors at the start of its input and returns the text left
//! after the marker, so callers never slice by hand.

/// Bullet used by the generation pipeline for unordered items.
pub const BULLET: char = '•';

/// Which list family a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Unordered,
    Ordered,
}

/// A recognized list marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch<'a> {
    pub kind: MarkerKind,
    /// Byte length of the consumed marker, including trailing whitespace.
    pub len: usize,
    pub rest: &'a str,
}

/// A recognized heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch<'a> {
    pub level: u8,
    pub text: &'a str,
}

/// `"• "` followed by the item text.
pub fn unordered_marker(line: &str) -> Option<MarkerMatch<'_>> {
    let after_bullet = line.strip_prefix(BULLET)?;
    let rest = after_bullet.strip_prefix(' ')?;
    Some(MarkerMatch {
        kind: MarkerKind::Unordered,
        len: line.len() - rest.len(),
        rest,
    })
}

/// Digits, a period, then at least one whitespace character.
///
/// `"3.14 is pi"` is not a marker: the period must be followed by whitespace.
pub fn ordered_marker(line: &str) -> Option<MarkerMatch<'_>> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let after_period = line[digits..].strip_prefix('.')?;
    if !after_period.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = after_period.trim_start();
    Some(MarkerMatch {
        kind: MarkerKind::Ordered,
        len: line.len() - rest.len(),
        rest,
    })
}

/// Either marker family.
pub fn list_marker(line: &str) -> Option<MarkerMatch<'_>> {
    unordered_marker(line).or_else(|| ordered_marker(line))
}

/// One to six `#` followed by whitespace.
pub fn heading(line: &str) -> Option<HeadingMatch<'_>> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(HeadingMatch {
        level: hashes as u8,
        text: rest.trim(),
    })
}

/// Any line starting with `#`, at any depth, with the level clamped to 1..=6.
///
/// Used by the sources-section converter, which accepts deeper headings than
/// the block segmenter does.
pub fn loose_heading(line: &str) -> Option<HeadingMatch<'_>> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 {
        return None;
    }
    Some(HeadingMatch {
        level: hashes.min(6) as u8,
        text: line[hashes..].trim(),
    })
}
