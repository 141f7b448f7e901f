//! Case-insensitive search across all registries.
//!
//! Nothing is indexed or cached: each search lists every registry and, for
//! agents and contexts, aggregates referenced file content on demand.

use crate::error::ApiError;
use crate::registry::{Agent, Context, Prompt, Record, Registries};
use serde::{Deserialize, Serialize};

/// Matching records grouped by kind, each group in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub agents: Vec<Agent>,
    pub contexts: Vec<Context>,
    pub prompts: Vec<Prompt>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.agents.len() + self.contexts.len() + self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

fn contains(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Whether `record` matches an already lower-cased query.
///
/// Name and description are checked first so the body (which may read files)
/// is only produced when needed. A record whose files cannot be read only
/// matches on name or description.
pub fn record_matches<R: Record>(record: &R, query_lower: &str) -> bool {
    contains(record.name(), query_lower)
        || contains(record.description(), query_lower)
        || record
            .searchable_content()
            .is_some_and(|body| contains(&body, query_lower))
}

fn filter_matches<R: Record>(records: Vec<R>, query_lower: &str) -> Vec<R> {
    records
        .into_iter()
        .filter(|r| record_matches(r, query_lower))
        .collect()
}

/// Search every registry for `query`.
pub fn search(registries: &Registries, query: &str) -> Result<SearchResults, ApiError> {
    let query = query.to_lowercase();
    let results = SearchResults {
        agents: filter_matches(registries.agents.list()?, &query),
        contexts: filter_matches(registries.contexts.list()?, &query),
        prompts: filter_matches(registries.prompts.list()?, &query),
    };
    tracing::debug!(query = %query, total = results.total(), "search completed");
    Ok(results)
}
