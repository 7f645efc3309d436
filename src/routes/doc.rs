use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, RegisterRequest, TokenResponse},
        cart::{AddToCartRequest, CartItemList, CartList, CheckoutRequest},
        orders::OrderList,
        products::{CreateProductRequest, ProductList},
        users::{NamePayload, UserList},
    },
    models::{Audit, Cart, CartItem, Order, OrderItem, OrderStatus, Product, Role, Tombstone, User},
    response::{ApiResponse, Meta},
    routes::{auth, carts, health, orders, params, products, users},
    utils::jwt::Claims,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::validate,
        users::get_profile,
        users::update_profile,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        products::list_products,
        products::get_product,
        products::create_product,
        carts::list_carts,
        carts::get_cart,
        carts::get_cart_items,
        carts::add_to_cart,
        carts::checkout,
        orders::list_orders,
        orders::get_order,
        orders::cancel_order
    ),
    components(
        schemas(
            User,
            Role,
            Audit,
            Tombstone,
            Claims,
            Product,
            Cart,
            CartItem,
            Order,
            OrderItem,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            NamePayload,
            CreateProductRequest,
            AddToCartRequest,
            CheckoutRequest,
            UserList,
            ProductList,
            CartList,
            CartItemList,
            OrderList,
            params::SortOrder,
            params::UserSortField,
            params::ProductSortField,
            params::CartSortField,
            params::OrderSortField,
            Meta,
            ApiResponse<User>,
            ApiResponse<Product>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<ProductList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and token validation"),
        (name = "Users", description = "Profile and user administration"),
        (name = "Products", description = "Product catalog"),
        (name = "Cart", description = "Cart items and checkout"),
        (name = "Orders", description = "Order listing and cancellation"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/validate",
            "/api/profile",
            "/api/users/{user_id}",
            "/api/carts/{cart_id}/checkout",
            "/api/orders/{order_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
