use crate::database::DatabaseResult;
use crate::database::entities::blacklisted_tokens;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

/// Blacklisted token DAO, keyed by token hash
pub struct BlacklistedTokensDao {
    db: DatabaseConnection,
}

impl BlacklistedTokensDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a token hash, keeping the original timestamp if it is already present
    pub async fn insert(&self, token_hash: &str, created_at: DateTime<Utc>) -> DatabaseResult<()> {
        let active_model = blacklisted_tokens::ActiveModel {
            token_hash: Set(token_hash.to_string()),
            created_at: Set(created_at),
        };

        blacklisted_tokens::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(blacklisted_tokens::Column::TokenHash)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    pub async fn exists(&self, token_hash: &str) -> DatabaseResult<bool> {
        let count = blacklisted_tokens::Entity::find()
            .filter(blacklisted_tokens::Column::TokenHash.eq(token_hash))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Delete records created before `cutoff`
    pub async fn delete_before(&self, cutoff: DateTime<Utc>) -> DatabaseResult<u64> {
        let result = blacklisted_tokens::Entity::delete_many()
            .filter(blacklisted_tokens::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
