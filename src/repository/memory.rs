//! In-memory stores used by service and router tests.
//!
//! Mirrors the database constraints: case-insensitive unique titles among
//! active books, unique (user, book) favorites, and favorites cascading on
//! hard delete.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{BookStore, FavoriteStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRequest, BookState, Favorite},
    search::{BookQuery, MatchKind},
};

#[derive(Default)]
struct Tables {
    books: Vec<Book>,
    favorites: Vec<Favorite>,
    last_book_id: i32,
    last_favorite_id: i32,
}

impl Tables {
    fn active(&self, id: i32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id && b.state.is_active())
    }

    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.books.iter().any(|b| {
            b.state.is_active()
                && Some(b.id) != except
                && MatchKind::Equals.matches(&b.title, title)
        })
    }

    fn with_book(&self, favorite: &Favorite) -> (Favorite, Option<Book>) {
        (favorite.clone(), self.active(favorite.book_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Repository whose both stores are this instance
    pub fn repository(self: &Arc<Self>) -> Repository {
        Repository::with_stores(self.clone(), self.clone())
    }

    /// Number of rows, deleted books included
    pub fn book_rows(&self) -> usize {
        self.lock().books.len()
    }

    pub fn favorite_rows(&self) -> usize {
        self.lock().favorites.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn query(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        Ok(query.apply(&self.lock().books))
    }

    async fn suggestions(&self, term: &str, limit: i64) -> AppResult<Vec<String>> {
        let tables = self.lock();
        let found: BTreeSet<String> = tables
            .books
            .iter()
            .filter(|b| b.state.is_active())
            .flat_map(|b| [&b.title, &b.author])
            .filter(|value| MatchKind::Contains.matches(value, term))
            .cloned()
            .collect();
        Ok(found.into_iter().take(limit.max(0) as usize).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.lock().active(id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        Ok(self
            .lock()
            .books
            .iter()
            .find(|b| b.state.is_active() && MatchKind::Equals.matches(&b.title, title))
            .cloned())
    }

    async fn create(&self, data: &BookRequest) -> AppResult<Book> {
        let mut tables = self.lock();
        if tables.title_taken(&data.title, None) {
            return Err(AppError::DuplicateTitle(data.title.clone()));
        }

        tables.last_book_id += 1;
        let now = Utc::now();
        let book = Book {
            id: tables.last_book_id,
            title: data.title.clone(),
            author: data.author.clone(),
            category: data.category.clone(),
            created_at: now,
            updated_at: now,
            state: BookState::Active,
        };
        tables.books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, data: &BookRequest) -> AppResult<Option<Book>> {
        let mut tables = self.lock();
        if tables.active(id).is_none() {
            return Ok(None);
        }
        if tables.title_taken(&data.title, Some(id)) {
            return Err(AppError::DuplicateTitle(data.title.clone()));
        }

        let book = tables.books.iter_mut().find(|b| b.id == id);
        Ok(book.map(|book| {
            book.title = data.title.clone();
            book.author = data.author.clone();
            book.category = data.category.clone();
            book.updated_at = Utc::now();
            book.clone()
        }))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.lock();
        match tables
            .books
            .iter_mut()
            .find(|b| b.id == id && b.state.is_active())
        {
            Some(book) => {
                book.state = BookState::Deleted { at: Utc::now() };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hard_delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        if tables.books.len() == before {
            return Ok(false);
        }
        tables.favorites.retain(|f| f.book_id != id);
        Ok(true)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.lock().books.iter().filter(|b| b.state.is_active()).count() as i64)
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<(Favorite, Option<Book>)>> {
        let tables = self.lock();
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| tables.with_book(f))
            .collect())
    }

    async fn find_for_user(
        &self,
        user_id: i32,
        id: i32,
    ) -> AppResult<Option<(Favorite, Option<Book>)>> {
        let tables = self.lock();
        Ok(tables
            .favorites
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .map(|f| tables.with_book(f)))
    }

    async fn exists(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        Ok(self
            .lock()
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.book_id == book_id))
    }

    async fn create(&self, user_id: i32, book_id: i32) -> AppResult<Favorite> {
        let mut tables = self.lock();
        if !tables.books.iter().any(|b| b.id == book_id) {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.book_id == book_id)
        {
            return Err(AppError::AlreadyFavorited(book_id));
        }

        tables.last_favorite_id += 1;
        let favorite = Favorite {
            id: tables.last_favorite_id,
            user_id,
            book_id,
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete(&self, user_id: i32, id: i32) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.favorites.len();
        tables.favorites.retain(|f| !(f.id == id && f.user_id == user_id));
        Ok(tables.favorites.len() < before)
    }

    async fn delete_by_book(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.book_id == book_id));
        Ok(tables.favorites.len() < before)
    }
}
