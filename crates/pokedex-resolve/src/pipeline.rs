//! Query pipeline: composes search, filter and sort/paginate.
//!
//! `list` is the combined operation and runs all three stages in that fixed
//! order, so filters narrow whatever the search kept. `search_only` and
//! `filter_only` are the split operations kept for clients that treat search
//! and filter as mutually exclusive; each skips the stage it does not own.

use pokedex_core::PokedexConfig;
use pokedex_store::{Dataset, Filters, Pokemon};
use tracing::debug;

use crate::types::{ListQuery, SearchSettings};
use crate::{filter, paginate, search};

/// Stateless pipeline configured once at startup.
#[derive(Debug, Clone)]
pub struct QueryPipeline {
    search: SearchSettings,
    default_limit: usize,
}

impl QueryPipeline {
    pub fn new(search: SearchSettings, default_limit: usize) -> Self {
        Self {
            search,
            default_limit,
        }
    }

    pub fn from_config(config: &PokedexConfig) -> Self {
        Self::new(SearchSettings::from(config), config.default_limit)
    }

    pub fn search_settings(&self) -> &SearchSettings {
        &self.search
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Combined list: search → filter → sort/paginate.
    pub fn list<'a>(&self, dataset: &'a Dataset, query: &ListQuery) -> Vec<&'a Pokemon> {
        let all: Vec<&Pokemon> = dataset.records().iter().collect();
        let total = all.len();

        let searched = search::apply(all, query.search_term.as_deref(), &self.search);
        let after_search = searched.len();

        let filtered = filter::apply(searched, &query.filters);
        let after_filter = filtered.len();

        let limit = query.limit.unwrap_or(self.default_limit);
        let page = paginate::sort_paginate(filtered, query.skip, limit);

        debug!(
            total,
            after_search,
            after_filter,
            returned = page.len(),
            policy = %self.search.policy,
            "list query resolved"
        );
        page
    }

    /// Split search: search → sort/paginate, no filters.
    pub fn search_only<'a>(
        &self,
        dataset: &'a Dataset,
        skip: usize,
        limit: Option<usize>,
        search_term: Option<&str>,
    ) -> Vec<&'a Pokemon> {
        let all: Vec<&Pokemon> = dataset.records().iter().collect();
        let searched = search::apply(all, search_term, &self.search);
        let page = paginate::sort_paginate(searched, skip, limit.unwrap_or(self.default_limit));
        debug!(returned = page.len(), "search query resolved");
        page
    }

    /// Split filter: filter → sort/paginate, no search.
    pub fn filter_only<'a>(
        &self,
        dataset: &'a Dataset,
        skip: usize,
        limit: Option<usize>,
        filters: &Filters,
    ) -> Vec<&'a Pokemon> {
        let all: Vec<&Pokemon> = dataset.records().iter().collect();
        let filtered = filter::apply(all, filters);
        let page = paginate::sort_paginate(filtered, skip, limit.unwrap_or(self.default_limit));
        debug!(returned = page.len(), "filter query resolved");
        page
    }
}

impl Default for QueryPipeline {
    fn default() -> Self {
        Self::new(SearchSettings::default(), pokedex_core::config::DEFAULT_LIMIT)
    }
}
