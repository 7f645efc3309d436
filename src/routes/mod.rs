use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod carts;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod users;

/// Everything mounted under `/api`. Each group carries its own auth layers.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/products", products::router(state.clone()))
        .nest("/carts", carts::router(state.clone()))
        .nest("/orders", orders::router(state.clone()))
        .merge(users::router(state))
}
