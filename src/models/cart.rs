use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::cart::AddToCartRequest,
    error::{AppError, AppResult},
};

use super::{Audit, Tombstone, User};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cart_items: Vec<CartItem>,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Tombstone>,
}

impl Cart {
    /// The cart allocated for a user at registration; its id is the user's `cart_id`.
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.cart_id,
            user_id: user.id,
            cart_items: Vec::new(),
            audit: Audit::new(user.id),
            deleted: None,
        }
    }

    pub fn attach_items(mut self, items: Vec<CartItem>) -> Self {
        self.cart_items.extend(items);
        self
    }
}

/// A cart line. `price` is the snapshot `unit price * quantity` taken when the
/// line was last written, not recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: f64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Tombstone>,
}

impl CartItem {
    pub fn new_from_payload(
        load: &AddToCartRequest,
        cart_id: Uuid,
        actor: Uuid,
        unit_price: f64,
    ) -> AppResult<Self> {
        if load.quantity <= 0 {
            return Err(AppError::bad_request("quantity must be greater than 0"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            cart_id,
            product_id: load.product_id,
            quantity: load.quantity,
            price: unit_price * f64::from(load.quantity),
            audit: Audit::new(actor),
            deleted: None,
        })
    }

    /// Adds `delta` to the quantity and re-snapshots the price at `unit_price`.
    pub fn merge(&mut self, delta: i32, unit_price: f64, actor: Uuid) -> AppResult<()> {
        let quantity = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| AppError::bad_request("quantity out of range"))?;
        if quantity < 1 {
            return Err(AppError::bad_request("quantity cannot be less than 1"));
        }
        self.quantity = quantity;
        self.price = unit_price * f64::from(quantity);
        self.audit.touch(actor);
        Ok(())
    }
}
