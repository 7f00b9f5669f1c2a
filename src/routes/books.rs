use crate::{
    auth::ClaimsExtractor,
    books::CreateBookRequest,
    database::entities::Book,
    error::AppError,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};

pub fn create_book_routes() -> Router<Server> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", get(get_book).delete(delete_book))
}

pub async fn create_book(
    State(server): State<Server>,
    ClaimsExtractor(claims): ClaimsExtractor,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let book = server
        .book_service
        .create_book(&claims.user_id, request)
        .await?;
    Ok(Json(book))
}

pub async fn list_books(
    State(server): State<Server>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = server.book_service.list_books(&claims.user_id).await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(server): State<Server>,
    ClaimsExtractor(claims): ClaimsExtractor,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = server.book_service.get_book(&claims.user_id, &id).await?;
    Ok(Json(book))
}

pub async fn delete_book(
    State(server): State<Server>,
    ClaimsExtractor(claims): ClaimsExtractor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    server.book_service.delete_book(&claims.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{GoogleUserInfo, session_auth_middleware};
    use crate::test_utils::TestServerBuilder;
    use axum::{body::Body, http::Request, middleware};
    use tower::ServiceExt;

    async fn setup() -> (Router, String) {
        let server = TestServerBuilder::new().build().await;
        let token = server
            .jwt_service
            .issue(&GoogleUserInfo {
                id: "reader-1".to_string(),
                email: "reader@example.com".to_string(),
                ..Default::default()
            })
            .unwrap();

        let app = create_book_routes()
            .layer(middleware::from_fn_with_state(
                server.clone(),
                session_auth_middleware,
            ))
            .with_state(server);
        (app, token)
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token));
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let (app, token) = setup().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/books",
                &token,
                Some(r#"{"title":"Dune","author":"Frank Herbert","comment":"Spice","rating":5}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["user_id"], "reader-1");
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/books/{}", id), &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], "Dune");

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/books/{}", id), &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request("GET", "/books", &token, None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_bad_inputs() {
        let (app, token) = setup().await;

        let response = app
            .clone()
            .oneshot(request("POST", "/books", &token, Some("{not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/books",
                &token,
                Some(r#"{"title":"Dune","author":"Frank Herbert","rating":9}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Rating must be between 0 and 5"
        );

        let response = app
            .oneshot(request("GET", "/books/not-a-uuid", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid ID format");
    }
}
