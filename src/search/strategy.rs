//! Search strategy selection: turns a search type tag and a query term into a
//! match predicate, and parses the sort parameters of the advanced search.

use std::str::FromStr;

use super::fuzzy::fuzzy_patterns;
use super::predicate::{BookField, MatchKind, Predicate};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    Exact,
    StartsWith,
    #[default]
    Contains,
    Fuzzy,
}

impl SearchType {
    /// Build the match predicate for a trimmed, non-empty term
    pub fn predicate(&self, term: &str) -> Predicate {
        const TITLE_AUTHOR: &[BookField] = &[BookField::Title, BookField::Author];

        match self {
            SearchType::Exact => Predicate::across(TITLE_AUTHOR, MatchKind::Equals, term),
            SearchType::StartsWith => Predicate::across(TITLE_AUTHOR, MatchKind::StartsWith, term),
            SearchType::Contains => Predicate::across(
                &[BookField::Title, BookField::Author, BookField::Category],
                MatchKind::Contains,
                term,
            ),
            SearchType::Fuzzy => fuzzy_patterns(term)
                .iter()
                .fold(Predicate::default(), |acc, pattern| {
                    acc.or(Predicate::across(TITLE_AUTHOR, MatchKind::Contains, pattern))
                }),
        }
    }
}

impl FromStr for SearchType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(SearchType::Exact),
            "starts_with" => Ok(SearchType::StartsWith),
            "contains" => Ok(SearchType::Contains),
            "fuzzy" => Ok(SearchType::Fuzzy),
            other => Err(AppError::InvalidSearchType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    Author,
    Category,
    CreatedAt,
    #[default]
    Relevance,
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "author" => Ok(SortField::Author),
            "category" => Ok(SortField::Category),
            "created_at" => Ok(SortField::CreatedAt),
            "relevance" => Ok(SortField::Relevance),
            other => Err(AppError::InvalidSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(AppError::InvalidSortOrder(other.to_string())),
        }
    }
}
