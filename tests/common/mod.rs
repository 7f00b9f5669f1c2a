use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use tower::ServiceExt;
use tranquil_pages::{Config, Server, auth::GoogleUserInfo};

pub const TEST_JWT_SECRET: &str = "dGVzdF9zZWNyZXRfZm9yX2p3dF90ZXN0aW5nXzMyYnl0ZXM=";

/// Unified test harness that handles app setup and token management
pub struct TestHarness {
    pub server: Server,
    pub app: Router,
}

#[allow(dead_code)]
impl TestHarness {
    /// Server over an in-memory SQLite database
    pub async fn new() -> Self {
        Self::with_config(Self::base_config()).await
    }

    /// Server whose Google endpoints point at `mock_uri`
    pub async fn with_google(mock_uri: &str, frontend_url: Option<&str>) -> Self {
        let mut config = Self::base_config();
        config.oauth.google.client_id = "test-client-id".to_string();
        config.oauth.google.client_secret = "test-client-secret".to_string();
        config.oauth.google.token_url = format!("{}/token", mock_uri);
        config.oauth.google.user_info_url = format!("{}/userinfo", mock_uri);
        config.frontend.url = frontend_url.map(str::to_string);
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Self {
        let server = Server::new(config).await.unwrap();
        let app = server.create_app();
        Self { server, app }
    }

    pub fn base_config() -> Config {
        let mut config = Config::default();
        config.jwt.secret = TEST_JWT_SECRET.to_string();
        config.database.url = "sqlite::memory:".to_string();
        config.jobs.enabled = false;
        config
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.server
            .jwt_service
            .issue(&GoogleUserInfo {
                id: user_id.to_string(),
                email: format!("{}@example.com", user_id),
                verified_email: true,
                name: Some(format!("Reader {}", user_id)),
                ..Default::default()
            })
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get_with_bearer(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn json_request(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Authorization", format!("Bearer {}", token))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
