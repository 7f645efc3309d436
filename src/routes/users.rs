use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::get,
};

use crate::{
    dto::users::{NamePayload, UserList},
    error::AppResult,
    extractors::{QueryParams, UuidPath, ValidatedJson},
    middleware::auth::{AuthUser, authenticate, require_admin, require_self_or_admin},
    models::User,
    response::ApiResponse,
    routes::params::UserListQuery,
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let profile = Router::new().route("/profile", get(get_profile).put(update_profile));

    let admin = Router::new()
        .route("/users", get(list_users))
        .route_layer(middleware::from_fn(require_admin));

    let by_id = Router::new()
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn(require_self_or_admin));

    Router::new()
        .merge(profile)
        .merge(admin)
        .merge(by_id)
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.users.get_by_id(claims.user_id).await?;
    Ok(Json(ApiResponse::success("OK", user, None)))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = NamePayload,
    responses(
        (status = 200, description = "Renamed current user", body = ApiResponse<User>)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<NamePayload>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state
        .users
        .update_name(payload, claims.user_id, claims.user_id)
        .await?;
    Ok(Json(ApiResponse::success("Profile updated", user, None)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let page = query.page_request();
    let result = state.users.get_all(page).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        UserList {
            items: result.items,
        },
        Some(page.meta(result.total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    UuidPath(user_id): UuidPath,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.users.get_by_id(user_id).await?;
    Ok(Json(ApiResponse::success("OK", user, None)))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = NamePayload,
    responses(
        (status = 200, description = "Renamed user", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    UuidPath(user_id): UuidPath,
    ValidatedJson(payload): ValidatedJson<NamePayload>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state
        .users
        .update_name(payload, user_id, claims.user_id)
        .await?;
    Ok(Json(ApiResponse::success("User updated", user, None)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Soft-deleted user", body = ApiResponse<User>),
        (status = 409, description = "User already deleted")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    UuidPath(user_id): UuidPath,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.users.delete_by_id(user_id, claims.user_id).await?;
    Ok(Json(ApiResponse::success("User deleted", user, None)))
}
