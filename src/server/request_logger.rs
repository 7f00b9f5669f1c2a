use crate::{auth::SessionClaims, utils::request_id::RequestIdExt};
use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};
use tracing::info;

const LOGGED_PREFIXES: [&str; 3] = ["/auth", "/api", "/health"];

/// Logs one line per API request and one per response
///
/// The session gate runs inside this layer, so the user is read from the
/// response extensions where the gate leaves a copy of the claims.
pub async fn request_response_logger(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if !LOGGED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let request_id = req.extensions().request_id();
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!(
        method = %method,
        path = %path,
        ip = %ip,
        request_id = %request_id,
        "API request"
    );

    let start = Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();

    let user = response
        .extensions()
        .get::<SessionClaims>()
        .map(|claims| claims.user_id.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    info!(
        method = %method,
        path = %path,
        user = %user,
        status = %response.status().as_u16(),
        latency_ms = %duration.as_millis(),
        request_id = %request_id,
        "API response"
    );

    response
}
