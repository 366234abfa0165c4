//! Filter stage: strict AND-of-supersets over types and weaknesses.

use pokedex_store::{Filters, Pokemon};

/// True when every element of `required` appears in `have`.
pub fn contains_all(have: &[String], required: &[String]) -> bool {
    required.iter().all(|value| have.contains(value))
}

/// Whether a single record passes the filters.
pub fn matches(record: &Pokemon, filters: &Filters) -> bool {
    contains_all(&record.types, &filters.types)
        && contains_all(&record.weaknesses, &filters.weaknesses)
}

/// Keep the records carrying every required type and every required weakness.
pub fn apply<'a>(candidates: Vec<&'a Pokemon>, filters: &Filters) -> Vec<&'a Pokemon> {
    if filters.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|record| matches(record, filters))
        .collect()
}
