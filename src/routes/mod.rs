pub mod auth;
pub mod books;
pub mod health;

use crate::server::Server;
use axum::Router;

pub use auth::{create_auth_routes, create_user_routes};
pub use books::create_book_routes;
pub use health::create_health_routes;

/// Everything under `/api`; the caller adds the session gate
pub fn create_protected_api_routes() -> Router<Server> {
    Router::new()
        .merge(create_user_routes())
        .merge(create_book_routes())
}
