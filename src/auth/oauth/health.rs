use crate::{
    auth::config::GoogleOAuthConfig,
    health::{HealthCheckResult, HealthChecker},
};

/// Health checker implementation for the Google OAuth client configuration
pub struct OAuthHealthChecker {
    config: GoogleOAuthConfig,
}

impl OAuthHealthChecker {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl HealthChecker for OAuthHealthChecker {
    fn name(&self) -> &str {
        "oauth"
    }

    async fn check(&self) -> HealthCheckResult {
        let details = serde_json::json!({
            "provider": "google",
            "redirect_uri": self.config.redirect_uri(),
            "scopes": self.config.scopes,
        });

        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            HealthCheckResult::degraded_with_details(
                "Google OAuth client credentials are not configured".to_string(),
                details,
            )
        } else {
            HealthCheckResult::healthy_with_details(details)
        }
    }
}
