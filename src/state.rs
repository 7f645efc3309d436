use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::Db,
    repositories::{PgCartRepository, PgOrderRepository, PgProductRepository, PgUserRepository},
    services::{
        AuthService, AuthServiceImpl, CartService, CartServiceImpl, OrderService,
        OrderServiceImpl, ProductService, ProductServiceImpl, UserService, UserServiceImpl,
    },
    utils::jwt::JwtSigner,
};

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtSigner>,
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub products: Arc<dyn ProductService>,
    pub carts: Arc<dyn CartService>,
    pub orders: Arc<dyn OrderService>,
}

impl AppState {
    /// Wires repositories and services over the given connections.
    pub fn new(db: Db, config: &AppConfig) -> Self {
        let jwt = Arc::new(JwtSigner::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.jwt_ttl_minutes,
        ));

        let users: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(Arc::new(
            PgUserRepository::new(db.clone()),
        )));
        let products: Arc<dyn ProductService> = Arc::new(ProductServiceImpl::new(Arc::new(
            PgProductRepository::new(db.clone()),
        )));
        let orders: Arc<dyn OrderService> = Arc::new(OrderServiceImpl::new(Arc::new(
            PgOrderRepository::new(db.clone()),
        )));
        let carts: Arc<dyn CartService> = Arc::new(CartServiceImpl::new(
            Arc::new(PgCartRepository::new(db)),
            products.clone(),
            orders.clone(),
        ));
        let auth: Arc<dyn AuthService> = Arc::new(AuthServiceImpl::new(users.clone(), jwt.clone()));

        Self {
            jwt,
            auth,
            users,
            products,
            carts,
            orders,
        }
    }
}
