use std::time::Instant;

use crate::metrics::metrics_recorder;
use crate::types::{AddressEntry, SearchResult};

/// Hard cap on the number of results returned by [`query`].
pub const MAX_RESULTS: usize = 10;

/// Queries whose trimmed length (in characters) is below this return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// A query that passed the length guard, split into normalized tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    tokens: Vec<String>,
}

impl PreparedQuery {
    /// Parses a raw query. Returns `None` when the trimmed query is shorter
    /// than [`MIN_QUERY_CHARS`].
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().chars().count() < MIN_QUERY_CHARS {
            return None;
        }
        Some(Self {
            tokens: canonical::query_tokens(raw),
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True iff every token is a substring of `normalized`.
    ///
    /// A query made only of punctuation has no tokens and matches everything.
    pub fn matches(&self, normalized: &str) -> bool {
        self.tokens.iter().all(|t| normalized.contains(t.as_str()))
    }

    /// First [`MAX_RESULTS`] matching entries, in index order.
    pub fn run(&self, index: &[AddressEntry]) -> Vec<SearchResult> {
        index
            .iter()
            .filter(|entry| self.matches(&entry.normalized))
            .take(MAX_RESULTS)
            .map(AddressEntry::to_result)
            .collect()
    }
}

/// Runs a raw autocomplete query against `index`.
///
/// Queries shorter than [`MIN_QUERY_CHARS`] after trimming return an empty
/// list without inspecting the index.
pub fn query(index: &[AddressEntry], raw_query: &str) -> Vec<SearchResult> {
    let Some(prepared) = PreparedQuery::parse(raw_query) else {
        return Vec::new();
    };

    let start = Instant::now();
    let hits = prepared.run(index);

    if let Some(recorder) = metrics_recorder() {
        recorder.record_query(start.elapsed(), prepared.tokens().len(), hits.len());
    }

    hits
}

#[cfg(test)]
mod tests;
