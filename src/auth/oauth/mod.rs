//! Google OAuth 2.0 login
//!
//! The service creates a single-use state per login, checks it on the
//! callback, exchanges the code and fetches the user profile. Session tokens
//! are minted from the profile and revoked through the blacklist on logout.

pub mod flows;
pub mod health;
pub mod providers;
pub mod service;
pub mod state;

pub use flows::{GoogleUserInfo, OAuthFlows};
pub use health::OAuthHealthChecker;
pub use providers::{Oauth2Client, create_google_client};
pub use service::{LoginSession, OAuthService};
pub use state::generate_state;
