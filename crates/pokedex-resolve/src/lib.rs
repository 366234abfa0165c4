//! Resolvers: the list query pipeline over the in-memory dataset.
//!
//! A list query runs search, then filter, then sort-and-paginate. Each stage
//! lives in its own module and works on borrowed records, so a run never
//! copies the dataset.

pub mod filter;
pub mod fuzzy;
pub mod paginate;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod view;

pub use pipeline::QueryPipeline;
pub use types::*;
pub use view::{ControlMode, FilterKind, ViewState};
