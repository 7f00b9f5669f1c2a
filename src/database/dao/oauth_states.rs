use crate::database::DatabaseResult;
use crate::database::entities::{OAuthState, oauth_states};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// OAuth state DAO for database operations
pub struct OAuthStatesDao {
    db: DatabaseConnection,
}

impl OAuthStatesDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new state record. A reused state value is a constraint violation.
    pub async fn insert(
        &self,
        state: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DatabaseResult<OAuthState> {
        let active_model = oauth_states::ActiveModel {
            state: Set(state.to_string()),
            created_at: Set(created_at),
            expires_at: Set(expires_at),
        };

        oauth_states::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await?;

        Ok(OAuthState {
            state: state.to_string(),
            created_at,
            expires_at,
        })
    }

    /// Delete an unexpired state and return it
    ///
    /// The delete is conditional on the state still being unexpired, so of two
    /// concurrent callers only the one whose delete removes the row gets it.
    pub async fn take_unexpired(&self, state: &str) -> DatabaseResult<Option<OAuthState>> {
        let now = Utc::now();

        let Some(record) = oauth_states::Entity::find_by_id(state.to_string())
            .filter(oauth_states::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let result = oauth_states::Entity::delete_many()
            .filter(oauth_states::Column::State.eq(state))
            .filter(oauth_states::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await?;

        Ok((result.rows_affected == 1).then_some(record))
    }

    /// Delete all expired states
    pub async fn delete_expired(&self) -> DatabaseResult<u64> {
        let result = oauth_states::Entity::delete_many()
            .filter(oauth_states::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
