//! Approximate substring matching.
//!
//! Scores a term against a name by the fewest single-character edits
//! (insert, delete, substitute) that turn the term into some substring of the
//! name. Position in the name is ignored, so "saur" scores 0 against both
//! "Bulbasaur" and "Ivysaur".

/// Smallest edit distance between `pattern` and any substring of `text`.
///
/// Runs in O(len(pattern) * len(text)) with two rows of state.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }

    // Row for the empty pattern prefix is all zeros: a match may start anywhere.
    let mut prev = vec![0usize; text.len() + 1];
    let mut cur = vec![0usize; text.len() + 1];

    for (i, &p) in pattern.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &t) in text.iter().enumerate() {
            let substitute = prev[j] + usize::from(p != t);
            let delete = prev[j + 1] + 1;
            let insert = cur[j] + 1;
            cur[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.into_iter().min().unwrap_or(pattern.len())
}

/// Normalized score in `0.0..=1.0`; 0 is an exact substring hit.
pub fn score(term: &str, name: &str) -> f64 {
    let pattern: Vec<char> = term.to_lowercase().chars().collect();
    if pattern.is_empty() {
        return 0.0;
    }
    let text: Vec<char> = name.to_lowercase().chars().collect();
    let distance = substring_distance(&pattern, &text);
    distance.min(pattern.len()) as f64 / pattern.len() as f64
}
