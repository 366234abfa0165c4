//! Pokédex HTTP server: GraphQL endpoint, schema and health routes.

pub mod graphql;
pub mod routes;
pub mod state;
pub mod validate;

pub use routes::build_router;
pub use state::AppState;
