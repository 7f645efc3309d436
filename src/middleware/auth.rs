use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, AppResult},
    extractors::UuidPath,
    state::AppState,
    utils::jwt::Claims,
};

/// Claims of the authenticated caller, put in place by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))
    }
}

fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization scheme"))
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = state.jwt.verify(bearer_token(req.headers())?)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn require_admin(
    AuthUser(claims): AuthUser,
    req: Request,
    next: Next,
) -> AppResult<Response> {
    if !claims.is_admin() {
        tracing::warn!(user_id = %claims.user_id, "admin route denied");
        return Err(AppError::unauthorized("admin access required"));
    }
    Ok(next.run(req).await)
}

/// The `{cart_id}` in the path must be the caller's own cart unless the caller is an admin.
pub async fn require_cart_access(
    AuthUser(claims): AuthUser,
    UuidPath(cart_id): UuidPath,
    req: Request,
    next: Next,
) -> AppResult<Response> {
    if claims.cart_id != cart_id && !claims.is_admin() {
        tracing::warn!(user_id = %claims.user_id, %cart_id, "cart access denied");
        return Err(AppError::unauthorized("not allowed to access this cart"));
    }
    Ok(next.run(req).await)
}

pub async fn require_self_or_admin(
    AuthUser(claims): AuthUser,
    UuidPath(user_id): UuidPath,
    req: Request,
    next: Next,
) -> AppResult<Response> {
    if claims.user_id != user_id && !claims.is_admin() {
        tracing::warn!(caller = %claims.user_id, target = %user_id, "user access denied");
        return Err(AppError::unauthorized("not allowed to access this user"));
    }
    Ok(next.run(req).await)
}
