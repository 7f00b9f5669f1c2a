use crate::{
    auth::{
        AuthError,
        config::GoogleOAuthConfig,
        oauth::{providers::Oauth2Client, state::generate_state},
    },
    storage::StateStore,
};
use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse as OAuth2TokenResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Google user profile as returned by the user-info endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// OAuth flow handlers
pub struct OAuthFlows {
    config: GoogleOAuthConfig,
    client: Oauth2Client,
    http_client: Client,
    states: Arc<dyn StateStore>,
}

impl OAuthFlows {
    pub fn new(
        config: GoogleOAuthConfig,
        client: Oauth2Client,
        http_client: Client,
        states: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            config,
            client,
            http_client,
            states,
        }
    }

    /// Create and persist a fresh state, then build the provider URL carrying it
    pub async fn authorization_url(&self) -> Result<String, AuthError> {
        let state = generate_state()?;

        self.states
            .create(&state)
            .await
            .map_err(|e| AuthError::LoginInitiation {
                cause: format!("failed to store state: {}", e),
            })?;

        let (authorization_url, _csrf_token) = self
            .client
            .authorize_url(|| CsrfToken::new(state))
            .add_scopes(self.config.scopes.iter().map(|s| Scope::new(s.clone())))
            .url();

        debug!(url = %authorization_url, "Built OAuth authorization URL");
        Ok(authorization_url.to_string())
    }

    /// Consume the state, exchange the code and fetch the user profile
    pub async fn handle_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<GoogleUserInfo, AuthError> {
        match self.states.find_and_delete(state).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("OAuth callback with unknown or expired state");
                return Err(AuthError::InvalidState { cause: None });
            }
            Err(e) => {
                return Err(AuthError::InvalidState {
                    cause: Some(e.to_string()),
                });
            }
        }

        let access_token = self.exchange_code(code).await?;
        self.get_user_info(&access_token).await
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange {
                cause: e.to_string(),
            })?;

        Ok(token_result.access_token().secret().clone())
    }

    async fn get_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AuthError> {
        let response = self
            .http_client
            .get(&self.config.user_info_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfo {
                cause: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(AuthError::UserInfo {
                cause: format!("user info request failed with status: {}", response.status()),
            });
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AuthError::UserInfo {
                cause: format!("failed to parse user info: {e}"),
            })
    }
}
