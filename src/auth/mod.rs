pub mod config;
pub mod jwt;
pub mod middleware;
pub mod oauth;

pub use jwt::{JwtService, JwtServiceImpl, SessionClaims, TokenError};
pub use middleware::*;
pub use oauth::{GoogleUserInfo, LoginSession, OAuthService};

use crate::storage::StorageError;
use thiserror::Error;

/// Failures of the login flow and the authentication gate
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to generate redirect url for OAuth flow")]
    LoginInitiation { cause: String },
    #[error("OAuth state validation error: invalid or expired state")]
    InvalidState { cause: Option<String> },
    #[error("OAuth token exchange error: {cause}")]
    TokenExchange { cause: String },
    #[error("OAuth user info error: {cause}")]
    UserInfo { cause: String },
    #[error("Failed to generate access token after login")]
    TokenIssue(String),
    #[error("No session token supplied")]
    MissingCredentials,
    #[error("Invalid authorization header format")]
    MalformedHeader,
    #[error("Invalid or expired token")]
    InvalidToken(TokenError),
    #[error("Token has been revoked")]
    TokenRevoked,
    #[error("Failed to verify token status")]
    BlacklistCheck(StorageError),
    #[error("Failed to logout")]
    Logout(StorageError),
}
