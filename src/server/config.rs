use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_request")]
    pub log_request: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_request: default_log_request(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_request() -> bool {
    true
}

/// Where the browser lands after login, and how the session cookie is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Redirect target after a successful callback; also the allowed CORS origin.
    /// Without it the callback answers with the token as JSON.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_cookie_max_age_secs")]
    pub cookie_max_age_secs: i64,
    /// Set `Secure` on the session cookie; turn off only for plain-http development
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,
}

fn default_cookie_max_age_secs() -> i64 {
    3600
}

fn default_secure_cookie() -> bool {
    true
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            url: None,
            cookie_max_age_secs: default_cookie_max_age_secs(),
            secure_cookie: default_secure_cookie(),
        }
    }
}
