//! Shared application state.

use pokedex_core::PokedexConfig;
use pokedex_resolve::QueryPipeline;
use pokedex_store::Dataset;

use crate::graphql::{Executor, GraphQLRequest, GraphQLResponse};

/// Shared application state accessible from all route handlers.
///
/// The dataset is immutable after startup, so handlers read it without locking.
pub struct AppState {
    pub config: PokedexConfig,
    pub dataset: Dataset,
    pub pipeline: QueryPipeline,
}

impl AppState {
    pub fn new(config: PokedexConfig, dataset: Dataset) -> Self {
        let pipeline = QueryPipeline::from_config(&config);
        Self {
            config,
            dataset,
            pipeline,
        }
    }

    pub fn execute(&self, request: GraphQLRequest) -> GraphQLResponse {
        Executor::new(&self.dataset, &self.pipeline)
            .with_max_depth(self.config.max_query_depth)
            .execute(request)
    }
}
