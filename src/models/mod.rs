//! Data models for Bookshelf

pub mod book;
pub mod favorite;

// Re-export commonly used types
pub use book::{Book, BookRequest, BookState};
pub use favorite::{Favorite, FavoriteDetails, FavoriteRequest};
