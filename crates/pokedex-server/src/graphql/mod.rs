//! GraphQL surface over the Pokédex dataset.
//!
//! A small read-only engine: the parser covers operations, variables,
//! aliases and nested selections; the executor dispatches the four root
//! fields to the dataset and the list pipeline.

pub mod executor;
pub mod parser;
pub mod schema;
pub mod types;

pub use executor::Executor;
pub use schema::SCHEMA_SDL;
pub use types::{GraphQLError, GraphQLRequest, GraphQLResponse, Location};
