//! Routing and auth-layer behaviour. None of these requests reach the
//! database, so the app is built over a disconnected handle.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use commerce_api::{
    build_app,
    config::AppConfig,
    db::Db,
    dto::auth::RegisterRequest,
    models::User,
    state::AppState,
    utils::jwt::JwtSigner,
};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "router-test-secret";
const ISSUER: &str = "commerce-api";

fn app() -> Router {
    let config = AppConfig {
        database_url: "postgres://unused".into(),
        read_database_url: "postgres://unused".into(),
        max_connections: 1,
        jwt_secret: SECRET.into(),
        jwt_ttl_minutes: 60,
        jwt_issuer: ISSUER.into(),
        host: "127.0.0.1".into(),
        port: 0,
    };
    build_app(AppState::new(
        Db::single(DatabaseConnection::Disconnected),
        &config,
    ))
}

fn token_for(role: &str) -> (String, User) {
    let user = User::new_from_payload(RegisterRequest {
        email: "router@example.com".into(),
        user_name: "router".into(),
        name: "Router".into(),
        password: "pw".into(),
        role: role.into(),
    })
    .unwrap();
    let token = JwtSigner::new(SECRET, ISSUER, 60).issue(&user).unwrap();
    (token, user)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let response = app().oneshot(get("/api/orders", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn token_from_another_secret_is_unauthorized() {
    let user = User::new_from_payload(RegisterRequest {
        email: "mallory@example.com".into(),
        user_name: "mallory".into(),
        name: "Mallory".into(),
        password: "pw".into(),
        role: "admin".into(),
    })
    .unwrap();
    let forged = JwtSigner::new("not-the-secret", ISSUER, 60)
        .issue(&user)
        .unwrap();

    let response = app()
        .oneshot(get("/api/auth/validate", Some(&forged)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_echoes_claims() {
    let (token, user) = token_for("trainee");

    let response = app()
        .oneshot(get("/api/auth/validate", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["userId"], user.id.to_string());
    assert_eq!(body["data"]["cartId"], user.cart_id.to_string());
    assert_eq!(body["data"]["role"], "trainee");
}

#[tokio::test]
async fn trainee_cannot_list_users_or_carts() {
    let (token, _) = token_for("trainee");

    for uri in ["/api/users", "/api/carts"] {
        let response = app().oneshot(get(uri, Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn trainee_cannot_open_someone_elses_cart() {
    let (token, _) = token_for("trainee");
    let uri = format!("/api/carts/{}", Uuid::new_v4());

    let response = app().oneshot(get(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trainee_cannot_read_another_user() {
    let (token, _) = token_for("trainee");
    let uri = format!("/api/users/{}", Uuid::new_v4());

    let response = app().oneshot(get(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_path_id_is_bad_request() {
    let (token, _) = token_for("trainee");

    let response = app()
        .oneshot(get("/api/orders/not-a-uuid", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_registration_payload_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email":"nope","userName":"x","name":"X","password":"pw","role":"trainee"}"#,
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_path_uses_json_fallback() {
    let response = app().oneshot(get("/nowhere", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["data"]["path"], "/nowhere");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let response = app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
