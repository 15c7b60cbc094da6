//! Favorites repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::FavoriteStore;
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::{favorite::FavoriteBookRow, Book, Favorite},
};

/// Unique constraint on `(user_id, book_id)`
pub const USER_BOOK_UNIQUE: &str = "favorites_user_book_key";

/// Favorites joined with their book, deleted books left out of the join
const FAVORITE_WITH_BOOK: &str = r#"
    SELECT f.id, f.user_id, f.book_id, f.created_at,
           b.id AS b_id, b.title AS b_title, b.author AS b_author,
           b.category AS b_category, b.created_at AS b_created_at,
           b.updated_at AS b_updated_at, b.deleted_at AS b_deleted_at
    FROM favorites f
    LEFT JOIN books b ON b.id = f.book_id AND b.deleted_at IS NULL
"#;

#[derive(Clone)]
pub struct FavoritesRepository {
    pool: Pool<Postgres>,
}

impl FavoritesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for FavoritesRepository {
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<(Favorite, Option<Book>)>> {
        let rows = sqlx::query_as::<_, FavoriteBookRow>(&format!(
            "{} WHERE f.user_id = $1 ORDER BY f.id",
            FAVORITE_WITH_BOOK
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FavoriteBookRow::into_parts).collect())
    }

    async fn find_for_user(
        &self,
        user_id: i32,
        id: i32,
    ) -> AppResult<Option<(Favorite, Option<Book>)>> {
        let row = sqlx::query_as::<_, FavoriteBookRow>(&format!(
            "{} WHERE f.id = $1 AND f.user_id = $2",
            FAVORITE_WITH_BOOK
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FavoriteBookRow::into_parts))
    }

    async fn exists(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, user_id: i32, book_id: i32) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, book_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, book_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            e if is_unique_violation(&e, USER_BOOK_UNIQUE) => AppError::AlreadyFavorited(book_id),
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::NotFound(format!("Book {} not found", book_id))
            }
            e => AppError::Database(e),
        })
    }

    async fn delete(&self, user_id: i32, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_book(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
