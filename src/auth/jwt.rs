use crate::auth::config::JwtConfig;
use crate::auth::oauth::GoogleUserInfo;
use crate::health::{HealthCheckResult, HealthChecker};
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Default session token lifetime
pub const SESSION_TOKEN_TTL_HOURS: i64 = 24;

/// The only accepted signing algorithm
const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Token issued in the future")]
    NotYetValid,
    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenError::UnsupportedAlgorithm,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: String,
    pub email: String,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_user(user: &GoogleUserInfo, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            verified: user.verified_email,
            name: user.name.clone(),
            picture: user.picture.clone(),
            iat: now,
            exp: now + ttl.num_seconds(),
        }
    }
}

/// JWT service trait for dependency injection and testing
pub trait JwtService: Send + Sync {
    /// Create a session token for a provider profile
    fn issue(&self, user: &GoogleUserInfo) -> Result<String, TokenError>;

    /// Verify signature, algorithm and time bounds and return the claims
    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError>;

    /// Sign arbitrary claims
    fn encode_claims(&self, claims: &SessionClaims) -> Result<String, TokenError>;

    fn token_ttl(&self) -> Duration;
}

#[derive(Clone)]
pub struct JwtServiceImpl {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtServiceImpl")
            .field("algorithm", &SESSION_ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtServiceImpl {
    /// Build the service from a base64 encoded secret
    pub fn new(secret_b64: &str, ttl: Duration) -> Result<Self, TokenError> {
        let secret = decode_secret(secret_b64)?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            ttl,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        let ttl = config.token_ttl().ok_or_else(|| {
            TokenError::Signing(format!(
                "token lifetime of {} hours is out of range",
                config.token_ttl_hours
            ))
        })?;
        Self::new(&config.secret, ttl)
    }

    /// Create a health checker for this JWT service
    pub fn health_checker(&self) -> Arc<JwtHealthChecker> {
        Arc::new(JwtHealthChecker {
            service: self.clone(),
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation
    }
}

/// Decode and sanity check the configured secret
pub fn decode_secret(secret_b64: &str) -> Result<Vec<u8>, TokenError> {
    let trimmed = secret_b64.trim();
    if trimmed.is_empty() {
        return Err(TokenError::Signing("JWT secret is not configured".to_string()));
    }

    let secret = STANDARD
        .decode(trimmed)
        .map_err(|e| TokenError::Signing(format!("JWT secret is not valid base64: {}", e)))?;

    if secret.is_empty() {
        return Err(TokenError::Signing("JWT secret decodes to zero bytes".to_string()));
    }

    Ok(secret)
}

/// Reject any header that does not declare HS256, including ones the
/// jsonwebtoken header parser cannot represent such as `"alg": "none"`
fn check_header_algorithm(token: &str) -> Result<(), TokenError> {
    match jsonwebtoken::decode_header(token) {
        Ok(header) if header.alg == SESSION_ALGORITHM => Ok(()),
        Ok(_) => Err(TokenError::UnsupportedAlgorithm),
        Err(err) => {
            let declared_alg = token
                .split('.')
                .next()
                .and_then(|segment| URL_SAFE_NO_PAD.decode(segment).ok())
                .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
                .and_then(|header| header.get("alg").and_then(|v| v.as_str()).map(str::to_owned));

            match declared_alg {
                Some(alg) if alg != "HS256" => Err(TokenError::UnsupportedAlgorithm),
                _ => Err(TokenError::from(err)),
            }
        }
    }
}

impl JwtService for JwtServiceImpl {
    fn issue(&self, user: &GoogleUserInfo) -> Result<String, TokenError> {
        self.encode_claims(&SessionClaims::for_user(user, self.ttl))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        check_header_algorithm(token)?;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &Self::validation())?;
        let claims = token_data.claims;

        if claims.iat > Utc::now().timestamp() {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }

    fn encode_claims(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(SESSION_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn token_ttl(&self) -> Duration {
        self.ttl
    }
}

/// Health checker implementation for JWT service
pub struct JwtHealthChecker {
    service: JwtServiceImpl,
}

#[async_trait::async_trait]
impl HealthChecker for JwtHealthChecker {
    fn name(&self) -> &str {
        "jwt"
    }

    async fn check(&self) -> HealthCheckResult {
        let probe = GoogleUserInfo {
            id: "health-check".to_string(),
            email: "health@check.local".to_string(),
            ..Default::default()
        };

        let result = self
            .service
            .issue(&probe)
            .and_then(|token| self.service.verify(&token));

        match result {
            Ok(claims) if claims.user_id == probe.id => {
                HealthCheckResult::healthy_with_details(serde_json::json!({
                    "algorithm": "HS256",
                    "token_creation": "success",
                    "token_validation": "success"
                }))
            }
            Ok(_) => HealthCheckResult::unhealthy("Token validation returned incorrect claims".to_string()),
            Err(err) => HealthCheckResult::unhealthy_with_details(
                "Failed to round-trip test JWT token".to_string(),
                serde_json::json!({
                    "algorithm": "HS256",
                    "error": err.to_string()
                }),
            ),
        }
    }
}
