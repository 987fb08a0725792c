mod block;
mod config;
mod generation;
mod html;
mod inline;
mod links;
mod marker;
mod parser;
mod search;
mod sources;

pub use block::{Block, List, ListItem, Span};
pub use config::{Config, ConfigError, RenderConfig, SearchConfig};
pub use generation::{GenerationError, PromptTemplate, TextGenerator, generate_section};
pub use html::Mode;
pub use links::{
    AddedLink, LinkInsertion, ProductLink, SkipReason, SkippedLink, insert_product_links,
};
pub use search::{
    DEFAULT_TIMEOUT, Locale, SearchError, SearchProvider, SearchQuery, SearchResponse,
    SearchResult, extract_domain, filter_results, parse_organic_results, search_with_config,
};

use html::Emit;
use inline::{ALL_RULES, parse_inline};

/// Segment a document into blocks.
pub fn parse(document: &str) -> Vec<Block> {
    parser::parse(document)
}

/// Render a document using the default config.
pub fn render(document: &str, mode: Mode) -> String {
    render_with_config(document, mode, &Config::compiled_default())
}

/// Render a document with custom config.
pub fn render_with_config(document: &str, mode: Mode, config: &Config) -> String {
    let blocks = parse(document);
    html::blocks_to_html(
        &blocks,
        Emit {
            mode,
            escape: config.render.escape_html,
        },
    )
}

/// Render a sources section (headings and numbered references) using the default config.
pub fn render_sources_section(document: &str) -> String {
    render_sources_section_with_config(document, &Config::compiled_default())
}

/// Render a sources section with custom config.
pub fn render_sources_section_with_config(document: &str, config: &Config) -> String {
    sources::render(document, config.render.escape_html)
}

/// Convert inline markdown in a single run of text.
///
/// Never escapes, so running it over its own output changes nothing once no
/// markers remain.
pub fn convert_inline(text: &str, mode: Mode) -> String {
    let spans = parse_inline(text, ALL_RULES);
    html::spans_to_string(
        &spans,
        Emit {
            mode,
            escape: false,
        },
    )
}
