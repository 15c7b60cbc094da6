//! Business logic services

pub mod books;
pub mod favorites;

use crate::{error::AppError, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub favorites: favorites::FavoritesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            favorites: favorites::FavoritesService::new(repository),
        }
    }
}

/// Identifiers are assigned from 1 upwards
pub(crate) fn ensure_positive_id(id: i32) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest("ID must be a positive integer".to_string()));
    }
    Ok(())
}
