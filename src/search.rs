//! Boundary to an external search-results provider.
//!
//! Only the contract lives here: query and result types, the error taxonomy,
//! and decoding of a provider's JSON body. Transport is up to the implementor.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::SearchConfig;

/// Request timeout implementors should apply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("API request failed: {0}")]
    TransportFailure(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub location: String,
    pub language: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub count: usize,
    pub locale: Locale,
}

impl SearchQuery {
    pub fn from_config(query: impl Into<String>, config: &SearchConfig) -> Self {
        Self {
            query: query.into(),
            count: config.count,
            locale: Locale {
                location: config.location.clone(),
                language: config.language.clone(),
                country: config.country.clone(),
            },
        }
    }
}

/// One organic result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub position: u32,
    pub title: String,
    pub link: String,
    pub domain: String,
    pub snippet: String,
    pub displayed_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: u64,
}

/// Anything that can answer a search query.
///
/// Implementations map every failure onto [`SearchError`] and never panic.
pub trait SearchProvider {
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    organic_results: Vec<RawResult>,
    #[serde(default)]
    search_information: RawSearchInformation,
}

#[derive(Deserialize, Default)]
struct RawSearchInformation {
    #[serde(default)]
    total_results: u64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawResult {
    position: u32,
    title: String,
    link: String,
    snippet: String,
    displayed_link: String,
}

/// Decode a provider response body, keeping at most `count` organic results.
pub fn parse_organic_results(body: &str, count: usize) -> Result<SearchResponse, SearchError> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Unexpected(e.to_string()))?;

    let results: Vec<SearchResult> = raw
        .organic_results
        .into_iter()
        .take(count)
        .map(|r| SearchResult {
            domain: extract_domain(&r.link),
            position: r.position,
            title: r.title,
            link: r.link,
            snippet: r.snippet,
            displayed_link: r.displayed_link,
        })
        .collect();

    log::debug!(
        "decoded {} of {} search results",
        results.len(),
        raw.search_information.total_results
    );

    Ok(SearchResponse {
        results,
        total_results: raw.search_information.total_results,
    })
}

/// Network location of a URL without a leading `www.`.
///
/// Input without a scheme has no recognizable host and comes back unchanged.
pub fn extract_domain(url: &str) -> String {
    let Some((_, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return url.to_string();
    }
    authority
        .strip_prefix("www.")
        .unwrap_or(authority)
        .to_string()
}

fn normalize_domain(domain: &str) -> String {
    let lower = domain.to_lowercase();
    lower.strip_prefix("www.").unwrap_or(lower.as_str()).to_string()
}

/// Drop results whose domain contains an excluded domain, and, when
/// `include_only` is non-empty, results matching none of its domains.
/// Matching is case-insensitive substring matching.
pub fn filter_results<E, I>(
    results: Vec<SearchResult>,
    exclude: &[E],
    include_only: &[I],
) -> Vec<SearchResult>
where
    E: AsRef<str>,
    I: AsRef<str>,
{
    let exclude: Vec<String> = exclude.iter().map(|d| normalize_domain(d.as_ref())).collect();
    let include: Vec<String> = include_only
        .iter()
        .map(|d| normalize_domain(d.as_ref()))
        .collect();

    results
        .into_iter()
        .filter(|result| {
            let domain = result.domain.to_lowercase();
            if exclude.iter().any(|d| domain.contains(d.as_str())) {
                return false;
            }
            include.is_empty() || include.iter().any(|d| domain.contains(d.as_str()))
        })
        .collect()
}

/// Run a query with the configured locale and count, dropping results from
/// the configured `exclude_domains`.
pub fn search_with_config<P>(
    provider: &P,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError>
where
    P: SearchProvider + ?Sized,
{
    let query = SearchQuery::from_config(query, config);
    let results = provider.search(&query)?;
    let found = results.len();
    let kept = filter_results(results, config.exclude_domains.as_slice(), &[] as &[&str]);
    log::debug!(
        "{:?}: kept {} of {} results after exclusions",
        query.query,
        kept.len(),
        found
    );
    Ok(kept)
}
