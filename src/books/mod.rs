//! Book records owned by authenticated users

pub mod service;

pub use service::BookService;

use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 5;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Book with id {0} not found")]
    NotFound(String),
    #[error("Invalid ID format")]
    InvalidId(String),
    #[error("Rating must be between 0 and 5")]
    InvalidRating(i32),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Database error: {0}")]
    Storage(#[from] StorageError),
}

/// Body of `POST /api/books`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub rating: i32,
}
