//! Error types for Bookshelf server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::ApiResponse;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Book with title '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Book {0} is already in favorites")]
    AlreadyFavorited(i32),

    #[error("Invalid search type '{0}'. Must be: exact, starts_with, contains, or fuzzy")]
    InvalidSearchType(String),

    #[error("Invalid sort field '{0}'. Must be: title, author, category, created_at, or relevance")]
    InvalidSortField(String),

    #[error("Invalid sort order '{0}'. Must be: ASC or DESC")]
    InvalidSortOrder(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status and the short summary placed in the envelope `message`
    pub fn status_and_summary(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "Validation failed"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            AppError::InvalidSearchType(_)
            | AppError::InvalidSortField(_)
            | AppError::InvalidSortOrder(_) => (StatusCode::BAD_REQUEST, "Search failed"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::DuplicateTitle(_) => {
                (StatusCode::CONFLICT, "Book with this title already exists")
            }
            AppError::AlreadyFavorited(_) => (StatusCode::CONFLICT, "Book already in favorites"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

/// Returns true when a database error is a unique-constraint violation
/// on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.constraint().map_or(false, |c| c == constraint)
        }
        _ => false,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, summary) = self.status_and_summary();

        let detail = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ApiResponse::<()>::failure(summary, detail));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::BadRequest("ID must be a positive integer".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        first_violation(&errors, &[])
    }
}

/// Pick the first violated field following `field_order`, then any other
/// field in name order.
pub fn first_violation(errors: &validator::ValidationErrors, field_order: &[&str]) -> AppError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect();

    fields.sort_by_key(|(field, _)| {
        let rank = field_order
            .iter()
            .position(|f| *f == field.as_str())
            .unwrap_or(field_order.len());
        (rank, field.clone())
    });

    match fields.into_iter().next() {
        Some((field, message)) => AppError::Validation { field, message },
        None => AppError::validation("request", "Invalid input"),
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
