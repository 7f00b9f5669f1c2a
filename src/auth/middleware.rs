use crate::auth::{
    AuthError,
    jwt::{JwtService, SessionClaims},
};
use crate::error::AppError;
use crate::server::Server;
use crate::storage::BlacklistStore;
use crate::utils::request_id::RequestIdExt;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, trace, warn};

/// Cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "token";

/// Pull the session token from the `token` cookie, falling back to `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar
        .get(SESSION_COOKIE_NAME)
        .filter(|cookie| !cookie.value().is_empty())
    {
        return Ok(cookie.value().to_string());
    }

    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Verify a token and make sure it has not been revoked
///
/// A blacklist lookup failure rejects the request.
pub async fn authenticate(
    token: &str,
    jwt_service: &dyn JwtService,
    blacklist: &dyn BlacklistStore,
) -> Result<SessionClaims, AuthError> {
    let claims = jwt_service.verify(token).map_err(AuthError::InvalidToken)?;

    match blacklist.is_blacklisted(token).await {
        Ok(false) => Ok(claims),
        Ok(true) => Err(AuthError::TokenRevoked),
        Err(e) => Err(AuthError::BlacklistCheck(e)),
    }
}

/// Session authentication middleware; inserts [`SessionClaims`] into the request
/// and response extensions
pub async fn session_auth_middleware(
    State(server): State<Server>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let request_id = request.extensions().request_id();

    let token = extract_token(request.headers()).inspect_err(|e| {
        warn!(request_id = %request_id, error = %e, "Rejected request without usable credentials");
    })?;

    let claims = authenticate(
        &token,
        server.jwt_service.as_ref(),
        server.stores.blacklist.as_ref(),
    )
    .await
    .inspect_err(|e| match e {
        AuthError::BlacklistCheck(cause) => {
            error!(request_id = %request_id, error = %cause, "Blacklist lookup failed")
        }
        other => warn!(request_id = %request_id, error = %other, "Authentication failed"),
    })?;

    trace!(request_id = %request_id, user_id = %claims.user_id, "Session authentication successful");

    request.extensions_mut().insert(claims.clone());
    let mut response = next.run(request).await;
    // Read back by the request logger
    response.extensions_mut().insert(claims);
    Ok(response)
}

/// Custom extractor for [`SessionClaims`] set by [`session_auth_middleware`]
pub struct ClaimsExtractor(pub SessionClaims);

impl<S> FromRequestParts<S> for ClaimsExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(ClaimsExtractor)
            .ok_or_else(|| AppError::Auth(AuthError::MissingCredentials))
    }
}
