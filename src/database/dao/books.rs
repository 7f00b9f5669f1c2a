use crate::database::DatabaseResult;
use crate::database::entities::{Book, books};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Books DAO for database operations
pub struct BooksDao {
    db: DatabaseConnection,
}

impl BooksDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, book: &Book) -> DatabaseResult<()> {
        let active_model: books::ActiveModel = book.clone().into();
        let active_model = active_model.reset_all();

        books::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Book>> {
        let book = books::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;

        Ok(book)
    }

    /// Books owned by `user_id`, newest first
    pub async fn find_by_user_id(&self, user_id: &str) -> DatabaseResult<Vec<Book>> {
        let books = books::Entity::find()
            .filter(books::Column::UserId.eq(user_id))
            .order_by_desc(books::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(books)
    }

    /// Delete a book, returning the number of removed rows
    pub async fn delete(&self, id: &str) -> DatabaseResult<u64> {
        let result = books::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
