//! Relevance ranking.
//!
//! The rule table below is the only definition of the ranking: the
//! repository renders it into a SQL `CASE` expression and [`relevance_rank`]
//! evaluates it in memory. It does not depend on the search type in use.

use std::cmp::Ordering;

use super::predicate::{BookField, MatchKind};
use crate::models::Book;

/// Ordered rules; a book's rank is the 1-based index of the first rule it matches
pub const RELEVANCE_RULES: [(BookField, MatchKind); 4] = [
    (BookField::Title, MatchKind::Equals),
    (BookField::Title, MatchKind::StartsWith),
    (BookField::Title, MatchKind::Contains),
    (BookField::Author, MatchKind::Contains),
];

/// Rank of books matching no rule
pub const FALLBACK_RANK: i32 = RELEVANCE_RULES.len() as i32 + 1;

pub fn relevance_rank(book: &Book, term: &str) -> i32 {
    RELEVANCE_RULES
        .iter()
        .position(|(field, kind)| kind.matches(field.value(book), term))
        .map(|idx| idx as i32 + 1)
        .unwrap_or(FALLBACK_RANK)
}

/// Rank first, then title ascending, then id
pub fn compare_relevance(a: &Book, b: &Book, term: &str) -> Ordering {
    relevance_rank(a, term)
        .cmp(&relevance_rank(b, term))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}
