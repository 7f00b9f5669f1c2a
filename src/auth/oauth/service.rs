use crate::{
    auth::{
        AuthError,
        config::GoogleOAuthConfig,
        jwt::{JwtService, SessionClaims},
        oauth::{
            flows::{GoogleUserInfo, OAuthFlows},
            health::OAuthHealthChecker,
            providers::{create_google_client, create_http_client},
        },
    },
    error::AppError,
    storage::{BlacklistStore, StateStore},
};
use std::sync::Arc;
use tracing::info;

/// Result of a completed login
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub user: GoogleUserInfo,
    /// Session token lifetime in seconds
    pub expires_in: i64,
}

pub struct OAuthService {
    config: GoogleOAuthConfig,
    flows: OAuthFlows,
    jwt_service: Arc<dyn JwtService>,
    blacklist: Arc<dyn BlacklistStore>,
}

impl OAuthService {
    pub fn new(
        config: GoogleOAuthConfig,
        jwt_service: Arc<dyn JwtService>,
        states: Arc<dyn StateStore>,
        blacklist: Arc<dyn BlacklistStore>,
    ) -> Result<Self, AppError> {
        let client = create_google_client(&config)?;
        let http_client = create_http_client(&config)?;
        let flows = OAuthFlows::new(config.clone(), client, http_client, states);

        Ok(Self {
            config,
            flows,
            jwt_service,
            blacklist,
        })
    }

    pub async fn authorization_url(&self) -> Result<String, AuthError> {
        self.flows.authorization_url().await
    }

    /// Run the callback flow and mint a session token for the profile
    pub async fn complete_login(&self, code: &str, state: &str) -> Result<LoginSession, AuthError> {
        let user = self.flows.handle_callback(code, state).await?;

        let token = self
            .jwt_service
            .issue(&user)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        info!(user_id = %user.id, email = %user.email, "User logged in");

        Ok(LoginSession {
            token,
            user,
            expires_in: self.jwt_service.token_ttl().num_seconds(),
        })
    }

    /// Verify the token and add it to the blacklist
    pub async fn logout(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let claims = self
            .jwt_service
            .verify(token)
            .map_err(AuthError::InvalidToken)?;

        self.blacklist
            .blacklist(token)
            .await
            .map_err(AuthError::Logout)?;

        info!(user_id = %claims.user_id, "User logged out");
        Ok(claims)
    }

    /// Create a health checker for this OAuth service
    pub fn health_checker(&self) -> Arc<OAuthHealthChecker> {
        Arc::new(OAuthHealthChecker::new(self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtServiceImpl;
    use crate::storage::memory::{MemoryBlacklistStore, MemoryStateStore};
    use chrono::Duration;

    fn create_service(blacklist: Arc<MemoryBlacklistStore>) -> (OAuthService, Arc<JwtServiceImpl>) {
        let jwt = Arc::new(
            JwtServiceImpl::new(
                "dGVzdF9zZWNyZXRfZm9yX2p3dF90ZXN0aW5nXzMyYnl0ZXM=",
                Duration::hours(24),
            )
            .unwrap(),
        );
        let config = GoogleOAuthConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            ..Default::default()
        };
        let service = OAuthService::new(
            config,
            jwt.clone(),
            Arc::new(MemoryStateStore::new()),
            blacklist,
        )
        .unwrap();
        (service, jwt)
    }

    #[tokio::test]
    async fn test_logout_blacklists_token() {
        let blacklist = Arc::new(MemoryBlacklistStore::new());
        let (service, jwt) = create_service(blacklist.clone());
        let token = jwt
            .issue(&GoogleUserInfo {
                id: "7".to_string(),
                email: "seven@example.com".to_string(),
                ..Default::default()
            })
            .unwrap();

        let claims = service.logout(&token).await.unwrap();
        assert_eq!(claims.user_id, "7");
        assert!(blacklist.is_blacklisted(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_rejects_invalid_token() {
        let blacklist = Arc::new(MemoryBlacklistStore::new());
        let (service, _) = create_service(blacklist);

        let result = service.logout("garbage").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_complete_login_with_unknown_state() {
        let (service, _) = create_service(Arc::new(MemoryBlacklistStore::new()));
        let result = service.complete_login("code", "unknown").await;
        assert!(matches!(result, Err(AuthError::InvalidState { .. })));
    }
}
