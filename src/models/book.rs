//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{first_violation, AppResult};

/// Lifecycle of a catalog entry. Deleted books are invisible to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookState {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl BookState {
    pub fn is_active(&self) -> bool {
        matches!(self, BookState::Active)
    }
}

impl From<Option<DateTime<Utc>>> for BookState {
    fn from(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => BookState::Deleted { at },
            None => BookState::Active,
        }
    }
}

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub state: BookState,
}

/// Raw `books` row
#[derive(Debug, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
            state: row.deleted_at.into(),
        }
    }
}

/// Create / update book request (full replace of the text fields)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title is required and must be at most 255 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Author is required and must be at most 255 characters"))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Category is required and must be at most 255 characters"))]
    pub category: String,
}

impl BookRequest {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category: category.into(),
        }
    }

    /// Trim surrounding whitespace, then check presence and length.
    /// The first failing field is reported in title, author, category order.
    pub fn validated(self) -> AppResult<Self> {
        let trimmed = Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            category: self.category.trim().to_string(),
        };
        trimmed
            .validate()
            .map_err(|e| first_violation(&e, &["title", "author", "category"]))?;
        Ok(trimmed)
    }
}

/// Basic listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Search keyword matched against title, author and category
    pub search: Option<String>,
    /// Exact category filter
    pub category: Option<String>,
}

/// Advanced search query parameters.
///
/// Numeric values are kept as strings so that unparsable input falls back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Search term
    pub query: Option<String>,
    /// Exact category filter
    pub category: Option<String>,
    /// Author substring filter
    pub author: Option<String>,
    /// exact, starts_with, contains (default) or fuzzy
    pub search_type: Option<String>,
    /// title, author, category, created_at or relevance (default)
    pub sort_by: Option<String>,
    /// ASC (default) or DESC
    pub sort_order: Option<String>,
    /// 1-100, default 20
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    /// Default 0
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

/// Autocomplete query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionQuery {
    /// Text to complete (required)
    pub query: Option<String>,
    /// 1-20, default 10
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

/// Delete options
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteBookParams {
    /// Remove the row instead of marking it deleted
    pub permanent: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookCount {
    pub count: i64,
}
