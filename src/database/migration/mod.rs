use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250101_000001_create_oauth_states_table;
mod m20250101_000002_create_blacklisted_tokens_table;
mod m20250101_000003_create_books_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_oauth_states_table::Migration),
            Box::new(m20250101_000002_create_blacklisted_tokens_table::Migration),
            Box::new(m20250101_000003_create_books_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum OAuthStates {
    #[iden = "oauth_states"]
    Table,
    State,
    CreatedAt,
    ExpiresAt,
}

#[derive(Iden)]
pub enum BlacklistedTokens {
    Table,
    TokenHash,
    CreatedAt,
}

#[derive(Iden)]
pub enum Books {
    Table,
    Id,
    UserId,
    Title,
    Author,
    Comment,
    Rating,
    CreatedAt,
    UpdatedAt,
}
