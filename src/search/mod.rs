//! Catalog search: match predicates, fuzzy expansion, relevance ranking
//! and the query description handed to the repository.

pub mod fuzzy;
pub mod predicate;
pub mod query;
pub mod relevance;
pub mod strategy;

pub use predicate::{BookField, Condition, MatchKind, Predicate};
pub use query::{BookOrder, BookQuery, SortColumn, Window};
pub use relevance::{relevance_rank, RELEVANCE_RULES};
pub use strategy::{SearchType, SortField, SortOrder};
