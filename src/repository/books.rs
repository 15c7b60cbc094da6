//! Books repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::{book::BookRow, Book, BookRequest},
    search::{
        relevance::FALLBACK_RANK, BookField, BookOrder, BookQuery, Condition, MatchKind,
        RELEVANCE_RULES,
    },
};

const BOOK_COLUMNS: &str = "id, title, author, category, created_at, updated_at, deleted_at";

/// Partial unique index on `LOWER(title)` over active books
pub const TITLE_UNIQUE_INDEX: &str = "books_title_active_key";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_write_error(err: sqlx::Error, title: &str) -> AppError {
        if is_unique_violation(&err, TITLE_UNIQUE_INDEX) {
            AppError::DuplicateTitle(title.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

// =========================================================================
// SQL RENDERING
// =========================================================================

/// Render one condition, pushing its bound value onto `params`
fn condition_sql(cond: &Condition, params: &mut Vec<String>) -> String {
    let column = cond.field.column();
    match cond.kind.like_pattern(&cond.term) {
        Some(pattern) => {
            params.push(pattern);
            format!("{} ILIKE ${}", column, params.len())
        }
        None => {
            params.push(cond.term.clone());
            format!("LOWER({}) = LOWER(${})", column, params.len())
        }
    }
}

fn where_clause(query: &BookQuery, params: &mut Vec<String>) -> String {
    let mut conditions = vec!["deleted_at IS NULL".to_string()];

    if let Some(ref predicate) = query.predicate {
        if predicate.any_of.is_empty() {
            conditions.push("FALSE".to_string());
        } else {
            let any_of: Vec<String> = predicate
                .any_of
                .iter()
                .map(|c| condition_sql(c, params))
                .collect();
            conditions.push(format!("({})", any_of.join(" OR ")));
        }
    }

    if let Some(ref category) = query.category {
        let cond = Condition::new(BookField::Category, MatchKind::Equals, category.as_str());
        conditions.push(condition_sql(&cond, params));
    }

    if let Some(ref author) = query.author {
        let cond = Condition::new(BookField::Author, MatchKind::Contains, author.as_str());
        conditions.push(condition_sql(&cond, params));
    }

    format!("WHERE {}", conditions.join(" AND "))
}

fn order_clause(order: &BookOrder, params: &mut Vec<String>) -> String {
    match order {
        BookOrder::Id => "ORDER BY id ASC".to_string(),
        BookOrder::Column { column, direction } => {
            format!("ORDER BY {} {}, id ASC", column.sql(), direction.as_sql())
        }
        BookOrder::Relevance { term } => {
            let cases: Vec<String> = RELEVANCE_RULES
                .iter()
                .enumerate()
                .map(|(idx, (field, kind))| {
                    let cond = Condition::new(*field, *kind, term.as_str());
                    format!("WHEN {} THEN {}", condition_sql(&cond, params), idx + 1)
                })
                .collect();
            format!(
                "ORDER BY CASE {} ELSE {} END, LOWER(title) ASC, id ASC",
                cases.join(" "),
                FALLBACK_RANK
            )
        }
    }
}

/// Full SELECT statement for a query and its positional parameters
pub fn render_select(query: &BookQuery) -> (String, Vec<String>) {
    let mut params = Vec::new();
    let where_sql = where_clause(query, &mut params);
    let order_sql = order_clause(&query.order, &mut params);

    let mut sql = format!("SELECT {} FROM books {} {}", BOOK_COLUMNS, where_sql, order_sql);
    if let Some(window) = query.window {
        sql.push_str(&format!(" LIMIT {} OFFSET {}", window.limit, window.offset));
    }

    (sql, params)
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn query(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let (sql, params) = render_select(query);

        let mut builder = sqlx::query_as::<_, BookRow>(&sql);
        for param in &params {
            builder = builder.bind(param);
        }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn suggestions(&self, term: &str, limit: i64) -> AppResult<Vec<String>> {
        let pattern = MatchKind::Contains
            .like_pattern(term)
            .unwrap_or_default();

        let rows = sqlx::query_scalar::<_, String>(
            r#"
            SELECT suggestion FROM (
                SELECT title AS suggestion FROM books
                WHERE deleted_at IS NULL AND title ILIKE $1
                UNION
                SELECT author AS suggestion FROM books
                WHERE deleted_at IS NULL AND author ILIKE $1
            ) s
            ORDER BY suggestion
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE id = $1 AND deleted_at IS NULL",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Book::from))
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE LOWER(title) = LOWER($1) AND deleted_at IS NULL LIMIT 1",
            BOOK_COLUMNS
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Book::from))
    }

    async fn create(&self, data: &BookRequest) -> AppResult<Book> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            INSERT INTO books (title, author, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.category)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &data.title))?;

        Ok(row.into())
    }

    async fn update(&self, id: i32, data: &BookRequest) -> AppResult<Option<Book>> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            UPDATE books SET title = $1, author = $2, category = $3, updated_at = $4
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.category)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &data.title))?;

        Ok(row.map(Book::from))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn hard_delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
