//! # Error Suggestions
//!
//! Helpers for building mixin lookup errors that tell the caller what
//! went wrong and how to fix it. An unknown mixin name close to a
//! defined one gets a "did you mean" suggestion, and the defined names
//! are listed either way.

use crate::error::Error;

/// Build the error for a mixin name absent from the table.
///
/// Includes a "did you mean" suggestion when a defined name is within
/// edit distance 2 of `name`, followed by the list of defined names.
pub fn mixin_not_found<'a>(name: &str, available: impl Iterator<Item = &'a str>) -> Error {
    let available: Vec<&str> = available.collect();

    let mut hints = Vec::new();
    if let Some(similar) = find_similar(name, &available) {
        hints.push(format!("Did you mean '{}'?", similar));
    }
    if available.is_empty() {
        hints.push("No mixins are defined".to_string());
    } else {
        hints.push(format!("Defined mixins are: {}", available.join(", ")));
    }

    Error::MixinNotFound {
        name: name.to_string(),
        hint: Some(hints.join("\n  hint: ")),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            (distance <= 2 && distance < input.len()).then_some((candidate, distance))
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
