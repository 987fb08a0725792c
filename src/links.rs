//! Insert internal product links into markdown copy.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

/// Existing `[label](target)` links; text inside them is never re-linked.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").expect("valid link pattern"));

/// A product page and the phrases that may link to it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductLink {
    pub url: String,
    /// Matched as whole words when no anchor variant is present.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Preferred anchor phrases, tried first.
    #[serde(default)]
    pub anchor_variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLink {
    pub url: String,
    pub anchor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL already appears in the content.
    AlreadyLinked,
    /// Neither an anchor variant nor a keyword was found.
    NoAnchor,
    /// The best anchor was already used for another link.
    AnchorUsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLink {
    pub url: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInsertion {
    pub content: String,
    pub added: Vec<AddedLink>,
    pub skipped: Vec<SkippedLink>,
}

/// Link the first suitable phrase for each product page, in order.
pub fn insert_product_links(content: &str, links: &[ProductLink]) -> LinkInsertion {
    let mut content = content.to_string();
    let mut used_anchors = HashSet::new();
    let mut added = Vec::new();
    let mut skipped = Vec::new();

    for link in links {
        let skip = |reason| SkippedLink {
            url: link.url.clone(),
            reason,
        };

        if content.contains(&link.url) {
            log::debug!("{} is already linked", link.url);
            skipped.push(skip(SkipReason::AlreadyLinked));
            continue;
        }

        let Some(range) = find_anchor(&content, link) else {
            log::debug!("no anchor found for {}", link.url);
            skipped.push(skip(SkipReason::NoAnchor));
            continue;
        };

        let anchor = content[range.clone()].to_string();
        if !used_anchors.insert(anchor.to_lowercase()) {
            log::debug!("anchor {anchor:?} already used, skipping {}", link.url);
            skipped.push(skip(SkipReason::AnchorUsed));
            continue;
        }

        content.replace_range(range, &format!("[{anchor}]({})", link.url));
        log::info!("added link: {anchor} -> {}", link.url);
        added.push(AddedLink {
            url: link.url.clone(),
            anchor,
        });
    }

    LinkInsertion {
        content,
        added,
        skipped,
    }
}

/// Byte range of the best anchor: the first anchor variant present, else the
/// first keyword present as a whole word. Case-insensitive.
fn find_anchor(content: &str, link: &ProductLink) -> Option<Range<usize>> {
    let linked: Vec<Range<usize>> = MARKDOWN_LINK
        .find_iter(content)
        .map(|m| m.range())
        .collect();

    let variants = link
        .anchor_variants
        .iter()
        .map(|variant| regex::escape(variant));
    let keywords = link
        .keywords
        .iter()
        .map(|keyword| format!(r"\b{}\b", regex::escape(keyword)));

    variants.chain(keywords).find_map(|pattern| {
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .ok()?;
        re.find_iter(content)
            .map(|m| m.range())
            .find(|found| {
                !linked
                    .iter()
                    .any(|l| found.start < l.end && l.start < found.end)
            })
    })
}
