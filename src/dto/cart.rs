use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Cart, CartItem};

/// `quantity` may be negative to shrink an item that is already in the cart.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "at least one cart item is required"))]
    pub items: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CartList {
    #[schema(value_type = Vec<Cart>)]
    pub items: Vec<Cart>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CartItemList {
    #[schema(value_type = Vec<CartItem>)]
    pub items: Vec<CartItem>,
}
