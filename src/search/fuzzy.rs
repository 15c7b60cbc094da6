//! Fuzzy pattern generation.
//!
//! Not an edit-distance matcher: the term is expanded into its words and a
//! handful of known spelling variants, and each pattern is then matched as a
//! plain substring.

use indexmap::IndexSet;

/// Minimum length (exclusive) of a word to be searched on its own
const MIN_WORD_LEN: usize = 2;

/// Known key -> variant substitutions, applied to the lowercased term
pub const SUBSTITUTIONS: &[(&str, &[&str])] = &[
    ("har", &["harr", "harry"]),
    ("pot", &["pott", "potter"]),
    ("lord", &["lords"]),
    ("ring", &["rings", "ring"]),
    ("game", &["gaming"]),
    ("throne", &["thrones"]),
];

/// Expand a trimmed query term into substring patterns: the term itself,
/// each word longer than two characters, then the substitution variants.
/// Order is preserved and duplicates are dropped.
pub fn fuzzy_patterns(term: &str) -> Vec<String> {
    let mut patterns: IndexSet<String> = IndexSet::new();
    if term.is_empty() {
        return Vec::new();
    }

    patterns.insert(term.to_string());

    for word in term.split_whitespace() {
        if word.chars().count() > MIN_WORD_LEN {
            patterns.insert(word.to_string());
        }
    }

    for variant in variations(term) {
        patterns.insert(variant);
    }

    patterns.into_iter().collect()
}

fn variations(term: &str) -> Vec<String> {
    let lowered = term.to_lowercase();
    let mut out = Vec::new();
    for (key, subs) in SUBSTITUTIONS {
        if !lowered.contains(key) {
            continue;
        }
        for sub in subs.iter() {
            out.push(lowered.replace(key, sub));
        }
    }
    out
}
