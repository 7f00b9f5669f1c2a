use super::{BookError, CreateBookRequest, MAX_RATING, MIN_RATING};
use crate::database::entities::Book;
use crate::storage::BookStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Book business rules on top of a [`BookStore`]
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn create_book(
        &self,
        user_id: &str,
        request: CreateBookRequest,
    ) -> Result<Book, BookError> {
        let title = request.title.trim();
        let author = request.author.trim();

        if title.is_empty() {
            return Err(BookError::MissingField("title"));
        }
        if author.is_empty() {
            return Err(BookError::MissingField("author"));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&request.rating) {
            return Err(BookError::InvalidRating(request.rating));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            comment: request.comment,
            rating: request.rating,
            created_at: now,
            updated_at: now,
        };

        self.store.create(&book).await?;
        info!(user_id = %user_id, book_id = %book.id, "Book created");
        Ok(book)
    }

    /// Books of `user_id`, newest first
    pub async fn list_books(&self, user_id: &str) -> Result<Vec<Book>, BookError> {
        Ok(self.store.find_by_user_id(user_id).await?)
    }

    pub async fn get_book(&self, user_id: &str, id: &str) -> Result<Book, BookError> {
        validate_id(id)?;

        match self.store.find_by_id(id).await? {
            Some(book) if book.user_id == user_id => Ok(book),
            Some(_) => {
                debug!(user_id = %user_id, book_id = %id, "Book belongs to another user");
                Err(BookError::NotFound(id.to_string()))
            }
            None => Err(BookError::NotFound(id.to_string())),
        }
    }

    /// Delete a book; deleting a missing book succeeds
    pub async fn delete_book(&self, user_id: &str, id: &str) -> Result<(), BookError> {
        validate_id(id)?;

        match self.store.find_by_id(id).await? {
            None => Ok(()),
            Some(book) if book.user_id != user_id => Err(BookError::NotFound(id.to_string())),
            Some(_) => {
                self.store.delete(id).await?;
                info!(user_id = %user_id, book_id = %id, "Book deleted");
                Ok(())
            }
        }
    }
}

fn validate_id(id: &str) -> Result<(), BookError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| BookError::InvalidId(id.to_string()))
}
