pub mod auth_service;
pub mod cart_service;
pub mod order_service;
pub mod product_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceImpl};
pub use cart_service::{CartService, CartServiceImpl};
pub use order_service::{OrderService, OrderServiceImpl};
pub use product_service::{ProductService, ProductServiceImpl};
pub use user_service::{UserService, UserServiceImpl};
