//! Sort-and-paginate stage.

use pokedex_store::Pokemon;

/// Clamp a signed count from the query surface; negatives become zero.
pub fn clamp_count(value: Option<i64>) -> Option<usize> {
    value.map(|v| usize::try_from(v.max(0)).unwrap_or(usize::MAX))
}

/// Sort ascending by integer id, then keep `limit` records after skipping `skip`.
pub fn sort_paginate(mut candidates: Vec<&Pokemon>, skip: usize, limit: usize) -> Vec<&Pokemon> {
    candidates.sort_by(|a, b| a.id_order().cmp(&b.id_order()));
    candidates.into_iter().skip(skip).take(limit).collect()
}
