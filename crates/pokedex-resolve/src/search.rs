//! Search stage: narrows candidates by name.

use pokedex_store::Pokemon;

use crate::fuzzy;
use crate::types::{SearchPolicy, SearchSettings};

/// Apply the configured search policy. An absent or blank term is the identity.
pub fn apply<'a>(
    candidates: Vec<&'a Pokemon>,
    term: Option<&str>,
    settings: &SearchSettings,
) -> Vec<&'a Pokemon> {
    let term = match term.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return candidates,
    };

    match settings.policy {
        SearchPolicy::Substring => substring(candidates, term),
        SearchPolicy::Fuzzy => fuzzy_ranked(
            candidates,
            term,
            settings.fuzzy_threshold,
            settings.min_match_len,
        ),
    }
}

/// Case-insensitive substring match on `name`, input order preserved.
pub fn substring<'a>(candidates: Vec<&'a Pokemon>, term: &str) -> Vec<&'a Pokemon> {
    let needle = term.to_lowercase();
    candidates
        .into_iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .collect()
}

/// Typo-tolerant match on `name`, best score first, ties in input order.
///
/// Terms shorter than `min_match_len` characters yield nothing.
pub fn fuzzy_ranked<'a>(
    candidates: Vec<&'a Pokemon>,
    term: &str,
    threshold: f64,
    min_match_len: usize,
) -> Vec<&'a Pokemon> {
    if term.chars().count() < min_match_len {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &'a Pokemon)> = candidates
        .into_iter()
        .map(|record| (fuzzy::score(term, &record.name), record))
        .filter(|(score, _)| *score <= threshold)
        .collect();

    // sort_by is stable, so equal scores keep input order.
    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, record)| record).collect()
}
