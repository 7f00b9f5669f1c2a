use crate::auth::config::GoogleOAuthConfig;
use crate::error::AppError;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RedirectUrl, TokenUrl,
    basic::BasicClient,
};
use std::time::Duration;

// Avoid oauth2 type madness
pub type Oauth2Client =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

fn invalid_url(what: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Config(config::ConfigError::Message(format!(
        "Invalid Google OAuth {}: {}",
        what, err
    )))
}

/// Create the Google OAuth client with the redirect URI derived from `base_url`
pub fn create_google_client(config: &GoogleOAuthConfig) -> Result<Oauth2Client, AppError> {
    let auth_url = AuthUrl::new(config.authorization_url.clone())
        .map_err(|e| invalid_url("authorization URL", e))?;
    let token_url =
        TokenUrl::new(config.token_url.clone()).map_err(|e| invalid_url("token URL", e))?;
    let redirect_url =
        RedirectUrl::new(config.redirect_uri()).map_err(|e| invalid_url("redirect URI", e))?;

    Ok(BasicClient::new(ClientId::new(config.client_id.clone()))
        .set_client_secret(ClientSecret::new(config.client_secret.clone()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url))
}

/// HTTP client for provider calls
pub fn create_http_client(config: &GoogleOAuthConfig) -> Result<reqwest::Client, AppError> {
    reqwest::ClientBuilder::new()
        // Following redirects opens the client up to SSRF vulnerabilities.
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| AppError::Internal(format!("reqwest build error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            base_url: "http://localhost:8080".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_google_client() {
        let client = create_google_client(&create_test_config()).unwrap();
        assert_eq!(
            client.redirect_uri().map(|u| u.as_str().to_string()),
            Some("http://localhost:8080/auth/callback".to_string())
        );
    }

    #[test]
    fn test_invalid_token_url_is_config_error() {
        let mut config = create_test_config();
        config.token_url = "not a url".to_string();

        let result = create_google_client(&config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_create_http_client() {
        assert!(create_http_client(&create_test_config()).is_ok());
    }
}
