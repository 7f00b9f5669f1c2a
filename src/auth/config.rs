use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Longest accepted session token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

pub const GOOGLE_AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USER_INFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Base64 (standard alphabet) encoded HMAC secret
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    24
}

impl JwtConfig {
    /// Token lifetime, `None` when `token_ttl_hours` is outside `1..=MAX_TOKEN_TTL_HOURS`
    pub fn token_ttl(&self) -> Option<Duration> {
        (1..=MAX_TOKEN_TTL_HOURS)
            .contains(&self.token_ttl_hours)
            .then(|| Duration::hours(self.token_ttl_hours))
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthConfig {
    #[serde(default)]
    pub google: GoogleOAuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Public base URL of this server; the redirect URI is `{base_url}/auth/callback`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_authorization_url")]
    pub authorization_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_user_info_url")]
    pub user_info_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_authorization_url() -> String {
    GOOGLE_AUTHORIZATION_URL.to_string()
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

fn default_user_info_url() -> String {
    GOOGLE_USER_INFO_URL.to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/userinfo.email".to_string(),
        "https://www.googleapis.com/auth/userinfo.profile".to_string(),
    ]
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            base_url: default_base_url(),
            authorization_url: default_authorization_url(),
            token_url: default_token_url(),
            user_info_url: default_user_info_url(),
            scopes: default_scopes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GoogleOAuthConfig {
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.base_url.trim_end_matches('/'))
    }
}
