//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookCount, BookListQuery, BookSearchQuery, DeleteBookParams, SuggestionQuery},
        Book, BookRequest,
    },
};

use super::{ApiResponse, Envelope};

/// List books, optionally filtered by keyword and category
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Books ordered by relevance when searching, by id otherwise", body = Envelope)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(params), _): WithRejection<Query<BookListQuery>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.services.books.list_books(&params).await?;
    Ok(Json(ApiResponse::success("Books retrieved successfully", books)))
}

/// Advanced search
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Envelope),
        (status = 400, description = "Unknown search type, sort field or sort order", body = Envelope)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(params), _): WithRejection<Query<BookSearchQuery>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.services.books.advanced_search(&params).await?;
    Ok(Json(ApiResponse::success("Search completed successfully", books)))
}

/// Title and author suggestions for autocomplete
#[utoipa::path(
    get,
    path = "/books/suggestions",
    tag = "books",
    params(SuggestionQuery),
    responses(
        (status = 200, description = "Sorted suggestions", body = Envelope),
        (status = 400, description = "Missing query", body = Envelope)
    )
)]
pub async fn get_suggestions(
    State(state): State<crate::AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SuggestionQuery>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    if params.query.as_deref().map_or(true, |q| q.trim().is_empty()) {
        return Err(AppError::BadRequest("Search query cannot be empty".to_string()));
    }
    let suggestions = state.services.books.suggestions(&params).await?;
    Ok(Json(ApiResponse::success("Suggestions retrieved successfully", suggestions)))
}

/// Number of books in the catalog
#[utoipa::path(
    get,
    path = "/books/count",
    tag = "books",
    responses(
        (status = 200, description = "Active book count", body = Envelope)
    )
)]
pub async fn count_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<BookCount>>> {
    let count = state.services.books.count_books().await?;
    Ok(Json(ApiResponse::success("Books counted successfully", BookCount { count })))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Envelope),
        (status = 404, description = "Book not found", body = Envelope)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(ApiResponse::success("Book retrieved successfully", book)))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 409, description = "Title already used", body = Envelope)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<BookRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let book = state.services.books.create_book(data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Book created successfully", book)),
    ))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Envelope),
        (status = 404, description = "Book not found", body = Envelope),
        (status = 409, description = "Title already used", body = Envelope)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<BookRequest>, AppError>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.books.update_book(id, data).await?;
    Ok(Json(ApiResponse::success("Book updated successfully", book)))
}

/// Delete a book (soft by default)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID"), DeleteBookParams),
    responses(
        (status = 200, description = "Book deleted", body = Envelope),
        (status = 404, description = "Book not found", body = Envelope)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(params), _): WithRejection<Query<DeleteBookParams>, AppError>,
) -> AppResult<Json<ApiResponse<()>>> {
    if params.permanent.unwrap_or(false) {
        state.services.books.purge_book(id).await?;
        return Ok(Json(ApiResponse::message("Book permanently deleted")));
    }
    state.services.books.delete_book(id).await?;
    Ok(Json(ApiResponse::message("Book deleted successfully")))
}
