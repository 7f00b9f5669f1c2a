use crate::{
    auth::{GoogleUserInfo, JwtService, JwtServiceImpl},
    config::Config,
    server::Server,
};
use chrono::Duration;

/// Base64 of a 32 byte test key
pub const TEST_JWT_SECRET: &str = "dGVzdF9zZWNyZXRfZm9yX2p3dF90ZXN0aW5nXzMyYnl0ZXM=";

/// Test server builder for creating test instances with configurable backends
pub struct TestServerBuilder {
    config: Config,
    use_memory_storage: bool,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.jwt.secret = TEST_JWT_SECRET.to_string();
        config.database.url = "sqlite::memory:".to_string();
        config.jobs.enabled = false;
        config.logging.log_request = false;
        config.frontend.secure_cookie = false;

        Self {
            config,
            use_memory_storage: false,
        }
    }

    /// DashMap stores instead of in-memory SQLite
    pub fn with_memory_storage(mut self) -> Self {
        self.use_memory_storage = true;
        self
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Point the Google token and user-info endpoints at a mock server
    pub fn with_google_endpoints(mut self, base_uri: &str) -> Self {
        let google = &mut self.config.oauth.google;
        google.client_id = "test-client-id".to_string();
        google.client_secret = "test-client-secret".to_string();
        google.token_url = format!("{}/token", base_uri);
        google.user_info_url = format!("{}/userinfo", base_uri);
        self
    }

    pub fn with_frontend_url(mut self, url: &str) -> Self {
        self.config.frontend.url = Some(url.to_string());
        self
    }

    pub async fn build(self) -> Server {
        let mut config = self.config;
        if self.use_memory_storage {
            config.storage.backend = "memory".to_string();
        }

        Server::new(config).await.unwrap()
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_test_jwt_service() -> JwtServiceImpl {
    JwtServiceImpl::new(TEST_JWT_SECRET, Duration::hours(24)).unwrap()
}

/// Session token for a minimal profile
pub fn create_test_token(jwt_service: &dyn JwtService, user_id: &str) -> String {
    jwt_service
        .issue(&GoogleUserInfo {
            id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            verified_email: true,
            ..Default::default()
        })
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_builder_default() {
        let server = TestServerBuilder::new().build().await;

        assert_eq!(server.config.database.url, "sqlite::memory:");
        assert!(server.database.is_some());
        assert!(!server.config.jobs.enabled);
    }

    #[tokio::test]
    async fn test_server_builder_with_memory_storage() {
        let server = TestServerBuilder::new().with_memory_storage().build().await;
        assert!(server.database.is_none());
        assert!(server.config.storage.is_memory());
    }

    #[tokio::test]
    async fn test_created_token_is_accepted() {
        let server = TestServerBuilder::new().build().await;
        let token = create_test_token(server.jwt_service.as_ref(), "reader-7");

        let claims = server.jwt_service.verify(&token).unwrap();
        assert_eq!(claims.user_id, "reader-7");
        assert!(claims.verified);
    }

    #[test]
    fn test_services_share_the_test_secret() {
        let token = create_test_token(&create_test_jwt_service(), "reader-8");
        let server_side = JwtServiceImpl::new(TEST_JWT_SECRET, Duration::hours(1)).unwrap();
        assert!(server_side.verify(&token).is_ok());
    }
}
