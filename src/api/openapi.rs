//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, favorites, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Book catalog and favorites REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::search_books,
        books::get_suggestions,
        books::count_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Favorites
        favorites::list_favorites,
        favorites::get_favorite,
        favorites::add_favorite,
        favorites::remove_favorite,
        favorites::remove_favorite_by_book,
    ),
    components(
        schemas(
            // Books
            crate::models::Book,
            crate::models::BookRequest,
            crate::models::book::BookCount,
            // Favorites
            crate::models::Favorite,
            crate::models::FavoriteDetails,
            crate::models::FavoriteRequest,
            // Health
            health::HealthResponse,
            // Envelope
            crate::api::Envelope,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog and search"),
        (name = "favorites", description = "Favorite books of the current user")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
