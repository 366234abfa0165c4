//! Pokédex Store: the read-only dataset, loaded once and shared by every request.

pub mod dataset;
pub mod types;

pub use dataset::{DanglingReference, Dataset};
pub use types::*;
