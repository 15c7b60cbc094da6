//! Favorites service

use validator::Validate;

use super::ensure_positive_id;
use crate::{
    error::{AppError, AppResult},
    models::{FavoriteDetails, FavoriteRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct FavoritesService {
    repository: Repository,
}

impl FavoritesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add an active book to the user's favorites
    pub async fn add_favorite(
        &self,
        user_id: i32,
        data: FavoriteRequest,
    ) -> AppResult<FavoriteDetails> {
        data.validate()?;
        let book_id = data.book_id;

        let book = self
            .repository
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

        if self.repository.favorites.exists(user_id, book_id).await? {
            return Err(AppError::AlreadyFavorited(book_id));
        }

        let favorite = self.repository.favorites.create(user_id, book_id).await?;
        tracing::info!(
            "Favorite added: id={} user_id={} book_id={}",
            favorite.id,
            user_id,
            book_id
        );
        Ok(FavoriteDetails::new(favorite, book))
    }

    /// Favorites of the user whose book is still in the catalog
    pub async fn list_favorites(&self, user_id: i32) -> AppResult<Vec<FavoriteDetails>> {
        let rows = self.repository.favorites.list_for_user(user_id).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(favorite, book)| match book {
                Some(book) => Some(FavoriteDetails::new(favorite, book)),
                None => {
                    tracing::debug!(
                        "Skipping favorite {}: book {} is gone",
                        favorite.id,
                        favorite.book_id
                    );
                    None
                }
            })
            .collect())
    }

    pub async fn get_favorite(&self, user_id: i32, id: i32) -> AppResult<FavoriteDetails> {
        ensure_positive_id(id)?;
        match self.repository.favorites.find_for_user(user_id, id).await? {
            Some((favorite, Some(book))) => Ok(FavoriteDetails::new(favorite, book)),
            _ => Err(AppError::NotFound(format!("Favorite {} not found", id))),
        }
    }

    pub async fn remove_favorite(&self, user_id: i32, id: i32) -> AppResult<()> {
        ensure_positive_id(id)?;
        if !self.repository.favorites.delete(user_id, id).await? {
            return Err(AppError::NotFound(format!("Favorite {} not found", id)));
        }
        tracing::info!("Favorite removed: id={} user_id={}", id, user_id);
        Ok(())
    }

    /// Remove the user's favorite for a book
    pub async fn remove_favorite_by_book(&self, user_id: i32, book_id: i32) -> AppResult<()> {
        ensure_positive_id(book_id)?;
        if !self
            .repository
            .favorites
            .delete_by_book(user_id, book_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "Book {} is not in favorites",
                book_id
            )));
        }
        tracing::info!("Favorite removed: book_id={} user_id={}", book_id, user_id);
        Ok(())
    }
}
