//! Pokédex Core: configuration and shared error types.

pub mod config;
pub mod error;

pub use config::{PokedexConfig, SearchPolicy};
pub use error::{Error, Result};
