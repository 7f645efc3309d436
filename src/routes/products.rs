use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::AppResult,
    extractors::{QueryParams, UuidPath, ValidatedJson},
    middleware::auth::{AuthUser, authenticate, require_admin},
    models::Product,
    response::ApiResponse,
    routes::params::ProductListQuery,
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_product))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(list_products))
        .route("/{product_id}", get(get_product))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductListQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let page = query.page_request();
    let result = state.products.get_all(page, query.title()).await?;
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList {
            items: result.items,
        },
        Some(page.meta(result.total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    UuidPath(product_id): UuidPath,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.get_by_id(product_id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.products.create(payload, claims.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Product created", product, None)),
    ))
}
