//! Favorite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::{Book, BookRow};

/// Favorite join record (user -> book)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Favorite with the current state of the referenced book
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteDetails {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub created_at: DateTime<Utc>,
    pub book: Book,
}

impl FavoriteDetails {
    pub fn new(favorite: Favorite, book: Book) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            book_id: favorite.book_id,
            created_at: favorite.created_at,
            book,
        }
    }
}

/// Add favorite request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FavoriteRequest {
    #[serde(default)]
    #[validate(range(min = 1, message = "Book ID is required"))]
    pub book_id: i32,
}

/// Favorite joined with its (possibly missing) active book
#[derive(Debug, FromRow)]
pub struct FavoriteBookRow {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub created_at: DateTime<Utc>,
    pub b_id: Option<i32>,
    pub b_title: Option<String>,
    pub b_author: Option<String>,
    pub b_category: Option<String>,
    pub b_created_at: Option<DateTime<Utc>>,
    pub b_updated_at: Option<DateTime<Utc>>,
    pub b_deleted_at: Option<DateTime<Utc>>,
}

impl FavoriteBookRow {
    /// Split into the favorite and its book, `None` when the join found no active book
    pub fn into_parts(self) -> (Favorite, Option<Book>) {
        let book = match (
            self.b_id,
            self.b_title,
            self.b_author,
            self.b_category,
            self.b_created_at,
            self.b_updated_at,
        ) {
            (Some(id), Some(title), Some(author), Some(category), Some(created_at), Some(updated_at)) => {
                Some(Book::from(BookRow {
                    id,
                    title,
                    author,
                    category,
                    created_at,
                    updated_at,
                    deleted_at: self.b_deleted_at,
                }))
            }
            _ => None,
        };

        let favorite = Favorite {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            created_at: self.created_at,
        };

        (favorite, book)
    }
}
