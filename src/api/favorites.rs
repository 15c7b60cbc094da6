//! Favorites endpoints, acting on behalf of the current user

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{FavoriteDetails, FavoriteRequest},
};

use super::{ApiResponse, CurrentUser, Envelope};

/// List the user's favorites
#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Favorites with their books", body = Envelope)
    )
)]
pub async fn list_favorites(
    State(state): State<crate::AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<FavoriteDetails>>>> {
    let favorites = state.services.favorites.list_favorites(user_id).await?;
    Ok(Json(ApiResponse::success("Favorites retrieved successfully", favorites)))
}

/// Get favorite by ID
#[utoipa::path(
    get,
    path = "/favorites/{id}",
    tag = "favorites",
    params(("id" = i32, Path, description = "Favorite ID")),
    responses(
        (status = 200, description = "Favorite details", body = Envelope),
        (status = 404, description = "Favorite not found", body = Envelope)
    )
)]
pub async fn get_favorite(
    State(state): State<crate::AppState>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<FavoriteDetails>>> {
    let favorite = state.services.favorites.get_favorite(user_id, id).await?;
    Ok(Json(ApiResponse::success("Favorite retrieved successfully", favorite)))
}

/// Add a book to favorites
#[utoipa::path(
    post,
    path = "/favorites",
    tag = "favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = Envelope),
        (status = 404, description = "Book not found", body = Envelope),
        (status = 409, description = "Book already in favorites", body = Envelope)
    )
)]
pub async fn add_favorite(
    State(state): State<crate::AppState>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Json(data), _): WithRejection<Json<FavoriteRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<FavoriteDetails>>)> {
    let favorite = state.services.favorites.add_favorite(user_id, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Favorite added successfully", favorite)),
    ))
}

/// Remove a favorite
#[utoipa::path(
    delete,
    path = "/favorites/{id}",
    tag = "favorites",
    params(("id" = i32, Path, description = "Favorite ID")),
    responses(
        (status = 200, description = "Favorite removed", body = Envelope),
        (status = 404, description = "Favorite not found", body = Envelope)
    )
)]
pub async fn remove_favorite(
    State(state): State<crate::AppState>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.favorites.remove_favorite(user_id, id).await?;
    Ok(Json(ApiResponse::message("Favorite removed successfully")))
}

/// Remove the favorite for a book
#[utoipa::path(
    delete,
    path = "/favorites/books/{book_id}",
    tag = "favorites",
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Favorite removed", body = Envelope),
        (status = 404, description = "Book not in favorites", body = Envelope)
    )
)]
pub async fn remove_favorite_by_book(
    State(state): State<crate::AppState>,
    CurrentUser(user_id): CurrentUser,
    WithRejection(Path(book_id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .favorites
        .remove_favorite_by_book(user_id, book_id)
        .await?;
    Ok(Json(ApiResponse::message("Favorite removed successfully")))
}
