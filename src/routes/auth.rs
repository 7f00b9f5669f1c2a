use crate::{
    auth::{ClaimsExtractor, GoogleUserInfo, SESSION_COOKIE_NAME, extract_token},
    error::AppError,
    server::{Server, config::FrontendConfig},
};
use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user denied consent
    pub error: Option<String>,
}

/// Callback body when no frontend url is configured
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: GoogleUserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

pub fn create_auth_routes() -> Router<Server> {
    Router::new()
        .route("/login", get(login_handler))
        .route("/callback", get(callback_handler))
        .route("/logout", post(logout_handler))
}

/// Routes mounted behind the session gate
pub fn create_user_routes() -> Router<Server> {
    Router::new().route("/user/me", get(me_handler))
}

pub async fn login_handler(State(server): State<Server>) -> Result<Redirect, AppError> {
    let url = server.oauth_service.authorization_url().await.inspect_err(|e| {
        warn!(error = ?e, "Failed to start OAuth login");
    })?;
    Ok(Redirect::temporary(&url))
}

pub async fn callback_handler(
    State(server): State<Server>,
    Query(params): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!(
            "OAuth provider returned an error: {}",
            error
        )));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("Code not found".to_string()))?;
    let state = params
        .state
        .filter(|state| !state.is_empty())
        .ok_or_else(|| AppError::BadRequest("State parameter is required".to_string()))?;

    let session = server
        .oauth_service
        .complete_login(&code, &state)
        .await
        .inspect_err(|e| warn!(error = ?e, "OAuth callback failed"))?;

    let frontend = &server.config.frontend;
    let jar = jar.add(session_cookie(frontend, session.token.clone()));

    match &frontend.url {
        Some(url) => Ok((jar, Redirect::temporary(url)).into_response()),
        None => Ok((
            jar,
            Json(LoginResponse {
                token: session.token,
                token_type: "Bearer".to_string(),
                expires_in: session.expires_in,
                user: session.user,
            }),
        )
            .into_response()),
    }
}

pub async fn logout_handler(
    State(server): State<Server>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), AppError> {
    let token = extract_token(&headers)?;
    let claims = server.oauth_service.logout(&token).await?;

    let mut removal = session_cookie(&server.config.frontend, String::new());
    removal.make_removal();

    info!(user_id = %claims.user_id, "Session cookie cleared");
    Ok((StatusCode::NO_CONTENT, jar.add(removal)))
}

pub async fn me_handler(ClaimsExtractor(claims): ClaimsExtractor) -> Json<UserProfile> {
    Json(UserProfile {
        id: claims.user_id,
        email: claims.email,
        name: claims.name,
        picture: claims.picture,
    })
}

fn session_cookie(frontend: &FrontendConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(frontend.secure_cookie)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(frontend.cookie_max_age_secs))
        .build()
}
