use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, CartItemList, CartList, CheckoutRequest},
    error::AppResult,
    extractors::{QueryParams, UuidPath, ValidatedJson},
    middleware::auth::{AuthUser, authenticate, require_admin, require_cart_access},
    models::{Cart, CartItem, Order},
    response::ApiResponse,
    routes::params::CartListQuery,
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_carts))
        .route_layer(middleware::from_fn(require_admin));

    let owned = Router::new()
        .route("/{cart_id}", get(get_cart).post(add_to_cart))
        .route("/{cart_id}/items", get(get_cart_items))
        .route("/{cart_id}/checkout", post(checkout))
        .route_layer(middleware::from_fn(require_cart_access));

    Router::new()
        .merge(admin)
        .merge(owned)
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[utoipa::path(
    get,
    path = "/api/carts",
    params(CartListQuery),
    responses(
        (status = 200, description = "List carts", body = ApiResponse<CartList>),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn list_carts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CartListQuery>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let page = query.page_request();
    let result = state.carts.get_all_carts(page).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        CartList {
            items: result.items,
        },
        Some(page.meta(result.total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/carts/{cart_id}",
    params(("cart_id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart with its items", body = ApiResponse<Cart>),
        (status = 404, description = "Cart not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    UuidPath(cart_id): UuidPath,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = state.carts.get_cart(cart_id).await?;
    Ok(Json(ApiResponse::success("OK", cart, None)))
}

#[utoipa::path(
    get,
    path = "/api/carts/{cart_id}/items",
    params(("cart_id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Items in the cart", body = ApiResponse<CartItemList>),
        (status = 404, description = "Cart not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart_items(
    State(state): State<AppState>,
    UuidPath(cart_id): UuidPath,
) -> AppResult<Json<ApiResponse<CartItemList>>> {
    let items = state.carts.get_cart_items(cart_id).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        CartItemList { items },
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cart_id}",
    params(("cart_id" = Uuid, Path, description = "Cart ID")),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added or merged", body = ApiResponse<CartItem>),
        (status = 400, description = "Not enough stock or invalid quantity"),
        (status = 404, description = "Cart or product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    UuidPath(cart_id): UuidPath,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItem>>)> {
    let item = state
        .carts
        .add_to_cart(payload, claims.user_id, cart_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Added to cart", item, None)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cart_id}/checkout",
    params(("cart_id" = Uuid, Path, description = "Cart ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created from cart items", body = ApiResponse<Order>),
        (status = 400, description = "Empty or duplicated item list"),
        (status = 404, description = "Cart, cart item or product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    UuidPath(cart_id): UuidPath,
    ValidatedJson(payload): ValidatedJson<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = state.carts.checkout(payload, cart_id, claims.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Checkout success", order, None)),
    ))
}
