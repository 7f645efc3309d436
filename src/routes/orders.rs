use axum::{Json, Router, extract::State, middleware, routing::get};

use crate::{
    dto::orders::OrderList,
    error::AppResult,
    extractors::{QueryParams, UuidPath},
    middleware::auth::{AuthUser, authenticate},
    models::Order,
    repositories::OrderFilter,
    response::ApiResponse,
    routes::params::OrderListQuery,
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{order_id}", get(get_order).delete(cancel_order))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders visible to the caller, items attached", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status or sort field")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    QueryParams(query): QueryParams<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let page = query.page_request();
    let filter = OrderFilter {
        user_id: query.user_id,
        status: query.status,
        cancelled: query.cancelled,
    };
    let result = state
        .orders
        .get_all(page, filter, claims.user_id, claims.role)
        .await?;

    Ok(Json(ApiResponse::success(
        "Ok",
        OrderList {
            items: result.items,
        },
        Some(page.meta(result.total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    UuidPath(order_id): UuidPath,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .orders
        .get_by_id(order_id, claims.user_id, claims.role)
        .await?;
    Ok(Json(ApiResponse::success("OK", order, None)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Cancelled order", body = ApiResponse<Order>),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    UuidPath(order_id): UuidPath,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .orders
        .cancel_order(order_id, claims.user_id, claims.role)
        .await?;
    Ok(Json(ApiResponse::success("Order cancelled", order, None)))
}
