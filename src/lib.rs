pub mod auth;
pub mod books;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod health;
pub mod jobs;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod storage;
#[cfg(test)]
pub mod test_utils;
pub mod utils;

pub use config::Config;
pub use error::AppError;
pub use server::Server;
