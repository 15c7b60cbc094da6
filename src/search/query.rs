//! Book query description shared by the listing and advanced search paths.

use std::cmp::Ordering;

use super::predicate::{BookField, MatchKind, Predicate};
use super::relevance::compare_relevance;
use super::strategy::SortOrder;
use crate::models::Book;

/// Plain sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Author,
    Category,
    CreatedAt,
}

impl SortColumn {
    /// Sort expression; text columns sort case-insensitively
    pub fn sql(&self) -> &'static str {
        match self {
            SortColumn::Title => "LOWER(title)",
            SortColumn::Author => "LOWER(author)",
            SortColumn::Category => "LOWER(category)",
            SortColumn::CreatedAt => "created_at",
        }
    }

    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let text = |field: BookField| field.value(a).to_lowercase().cmp(&field.value(b).to_lowercase());
        match self {
            SortColumn::Title => text(BookField::Title),
            SortColumn::Author => text(BookField::Author),
            SortColumn::Category => text(BookField::Category),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BookOrder {
    /// Insertion order
    #[default]
    Id,
    Column { column: SortColumn, direction: SortOrder },
    /// Relevance rank against `term`, then title. Always ascending.
    Relevance { term: String },
}

impl BookOrder {
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        match self {
            BookOrder::Id => a.id.cmp(&b.id),
            BookOrder::Column { column, direction } => {
                let ord = column.compare(a, b);
                let ord = match direction {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                };
                ord.then_with(|| a.id.cmp(&b.id))
            }
            BookOrder::Relevance { term } => compare_relevance(a, b, term),
        }
    }
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

/// Filters, order and window of a book query. Only active books ever match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub predicate: Option<Predicate>,
    /// Case-insensitive category equality
    pub category: Option<String>,
    /// Case-insensitive author substring
    pub author: Option<String>,
    pub order: BookOrder,
    pub window: Option<Window>,
}

impl BookQuery {
    pub fn matches(&self, book: &Book) -> bool {
        book.state.is_active()
            && self.predicate.as_ref().map_or(true, |p| p.matches(book))
            && self
                .category
                .as_deref()
                .map_or(true, |c| MatchKind::Equals.matches(&book.category, c))
            && self
                .author
                .as_deref()
                .map_or(true, |a| MatchKind::Contains.matches(&book.author, a))
    }

    /// Evaluate the query over an in-memory collection
    pub fn apply<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> Vec<Book> {
        let mut found: Vec<Book> = books
            .into_iter()
            .filter(|b| self.matches(b))
            .cloned()
            .collect();
        found.sort_by(|a, b| self.order.compare(a, b));

        match self.window {
            Some(Window { limit, offset }) => found
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect(),
            None => found,
        }
    }
}
