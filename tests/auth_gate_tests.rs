//! Credential extraction and rejection rules of the session gate

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use common::{TestHarness, body_json};
use jsonwebtoken::{EncodingKey, Header, encode};
use tranquil_pages::auth::SessionClaims;

#[tokio::test]
async fn test_missing_credentials() {
    let harness = TestHarness::new().await;

    let response = harness
        .send(Request::builder().uri("/api/books").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "No session token supplied"
    );
}

#[tokio::test]
async fn test_malformed_header_is_distinct() {
    let harness = TestHarness::new().await;

    let response = harness
        .send(
            Request::builder()
                .uri("/api/books")
                .header("Authorization", "InvalidFormat")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Invalid authorization header format"
    );
}

#[tokio::test]
async fn test_cookie_takes_precedence_over_header() {
    let harness = TestHarness::new().await;
    let token = harness.token_for("cookie-user");

    let response = harness
        .send(
            Request::builder()
                .uri("/api/user/me")
                .header("Cookie", format!("token={}", token))
                .header("Authorization", "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], "cookie-user");
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let harness = TestHarness::new().await;
    let token = harness.token_for("user-1");

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[2] = URL_SAFE_NO_PAD.encode(b"forged signature bytes");
    let tampered = parts.join(".");

    let response = harness.get_with_bearer("/api/books", &tampered).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let harness = TestHarness::new().await;
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        user_id: "user-1".to_string(),
        email: "user-1@example.com".to_string(),
        verified: true,
        name: None,
        picture: None,
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = harness.server.jwt_service.encode_claims(&claims).unwrap();

    let response = harness.get_with_bearer("/api/books", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_algorithm_is_rejected() {
    let harness = TestHarness::new().await;
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        user_id: "user-1".to_string(),
        email: "user-1@example.com".to_string(),
        verified: true,
        name: None,
        picture: None,
        iat: now,
        exp: now + 3600,
    };
    let secret = base64::engine::general_purpose::STANDARD
        .decode(common::TEST_JWT_SECRET)
        .unwrap();
    let token = encode(
        &Header::new(jsonwebtoken::Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(&secret),
    )
    .unwrap();

    let response = harness.get_with_bearer("/api/books", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoked_token_is_distinct_from_invalid() {
    let harness = TestHarness::new().await;
    let token = harness.token_for("user-1");

    assert_eq!(
        harness.get_with_bearer("/api/books", &token).await.status(),
        StatusCode::OK
    );

    harness.server.stores.blacklist.blacklist(&token).await.unwrap();

    let response = harness.get_with_bearer("/api/books", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Token revoked");
}
