//! Resolver types.

use pokedex_core::PokedexConfig;
pub use pokedex_core::SearchPolicy;
use pokedex_store::Filters;
use serde::{Deserialize, Serialize};

/// Tuning for the search stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub policy: SearchPolicy,
    /// Highest normalized edit distance accepted by the fuzzy policy.
    pub fuzzy_threshold: f64,
    /// Fuzzy terms shorter than this match nothing.
    pub min_match_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            policy: SearchPolicy::Substring,
            fuzzy_threshold: pokedex_core::config::DEFAULT_FUZZY_THRESHOLD,
            min_match_len: pokedex_core::config::DEFAULT_MIN_MATCH_LEN,
        }
    }
}

impl From<&PokedexConfig> for SearchSettings {
    fn from(config: &PokedexConfig) -> Self {
        Self {
            policy: config.search_policy,
            fuzzy_threshold: config.fuzzy_threshold,
            min_match_len: config.min_match_len,
        }
    }
}

/// A combined list query: search term, filters and a page window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    /// `None` means the pipeline's default limit.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub filters: Filters,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}
