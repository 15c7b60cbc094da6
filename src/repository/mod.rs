//! Repository layer for database operations

pub mod books;
pub mod favorites;
#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookRequest, Favorite},
    search::BookQuery,
};

/// Persistence of books. Every read only sees active books.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Run a filtered, ordered and windowed query
    async fn query(&self, query: &BookQuery) -> AppResult<Vec<Book>>;

    /// Sorted, distinct titles and authors containing `term`
    async fn suggestions(&self, term: &str, limit: i64) -> AppResult<Vec<String>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    /// Case-insensitive title lookup
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>>;

    /// Insert a book. Fails with `DuplicateTitle` on a title conflict.
    async fn create(&self, data: &BookRequest) -> AppResult<Book>;

    /// Replace the text fields of an active book, `None` if there is none
    async fn update(&self, id: i32, data: &BookRequest) -> AppResult<Option<Book>>;

    /// Mark an active book deleted; false if there was none
    async fn soft_delete(&self, id: i32) -> AppResult<bool>;

    /// Remove the row whatever its state; false if there was none
    async fn hard_delete(&self, id: i32) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

/// Persistence of favorites, always scoped to one user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Favorites of a user in insertion order, each with its book when
    /// that book is still active
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<(Favorite, Option<Book>)>>;

    async fn find_for_user(
        &self,
        user_id: i32,
        id: i32,
    ) -> AppResult<Option<(Favorite, Option<Book>)>>;

    async fn exists(&self, user_id: i32, book_id: i32) -> AppResult<bool>;

    /// Insert a favorite. Fails with `AlreadyFavorited` on a pair conflict.
    async fn create(&self, user_id: i32, book_id: i32) -> AppResult<Favorite>;

    async fn delete(&self, user_id: i32, id: i32) -> AppResult<bool>;

    async fn delete_by_book(&self, user_id: i32, book_id: i32) -> AppResult<bool>;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub favorites: Arc<dyn FavoriteStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            favorites: Arc::new(favorites::FavoritesRepository::new(pool)),
        }
    }

    /// Build a repository over arbitrary store implementations
    pub fn with_stores(books: Arc<dyn BookStore>, favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { books, favorites }
    }
}
