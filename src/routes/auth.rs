use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::auth::{LoginRequest, RegisterRequest, TokenResponse},
    error::AppResult,
    extractors::ValidatedJson,
    middleware::auth::{AuthUser, authenticate},
    response::ApiResponse,
    state::AppState,
    utils::jwt::Claims,
};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/validate", get(validate))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user and its cart", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TokenResponse>>)> {
    let token = state.auth.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User registered", token, None)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Unknown username")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let token = state.auth.login(payload).await?;
    Ok(Json(ApiResponse::success("Login success", token, None)))
}

#[utoipa::path(
    get,
    path = "/api/auth/validate",
    responses(
        (status = 200, description = "Decoded claims of the bearer token", body = ApiResponse<Claims>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn validate(AuthUser(claims): AuthUser) -> Json<ApiResponse<Claims>> {
    Json(ApiResponse::success("Token is valid", claims, None))
}
