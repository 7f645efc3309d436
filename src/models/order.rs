use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;

use super::{Audit, OrderStatus, SoftDelete, Tombstone};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload {
    pub user_id: Uuid,
    pub total_price: f64,
    pub status: OrderStatus,
}

/// One line taken out of a cart at checkout. `price` is the cart item's
/// snapshot, copied as is.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemPayload {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: f64,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItem>,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Tombstone>,
}

impl Order {
    pub fn new_from_payload(load: OrderPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: load.user_id,
            total_price: load.total_price,
            status: load.status,
            order_items: Vec::new(),
            audit: Audit::new(load.user_id),
            deleted: None,
        }
    }

    pub fn attach_items(mut self, items: Vec<OrderItem>) -> Self {
        self.order_items.extend(items);
        self
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Tombstones the order and every attached item with the same actor.
    /// Fails before touching any item if the order is already cancelled.
    pub fn cancel(&mut self, actor: Uuid) -> AppResult<()> {
        self.soft_delete(actor)?;
        let stamp = self.deleted;
        for item in &mut self.order_items {
            item.deleted = stamp;
            item.audit.touch(actor);
        }
        self.audit.touch(actor);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: f64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Tombstone>,
}

impl OrderItem {
    pub fn new_from_payload(load: OrderItemPayload, order_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: load.product_id,
            quantity: load.quantity,
            price: load.price,
            audit: Audit::new(load.user_id),
            deleted: None,
        }
    }
}

impl SoftDelete for Order {
    const ENTITY: &'static str = "Order";

    fn tombstone(&self) -> Option<&Tombstone> {
        self.deleted.as_ref()
    }

    fn tombstone_mut(&mut self) -> &mut Option<Tombstone> {
        &mut self.deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn order_with_items(user_id: Uuid, n: usize) -> Order {
        let order = Order::new_from_payload(OrderPayload {
            user_id,
            total_price: 10.0 * n as f64,
            status: OrderStatus::Pending,
        });
        let items = (0..n)
            .map(|_| {
                OrderItem::new_from_payload(
                    OrderItemPayload {
                        product_id: Uuid::new_v4(),
                        user_id,
                        quantity: 1,
                        price: 10.0,
                    },
                    order.id,
                )
            })
            .collect();
        order.attach_items(items)
    }

    #[test]
    fn items_inherit_order_id() {
        let order = order_with_items(Uuid::new_v4(), 2);
        assert!(order.order_items.iter().all(|i| i.order_id == order.id));
    }

    #[test]
    fn cancel_stamps_order_and_items_with_actor() {
        let user = Uuid::new_v4();
        let mut order = order_with_items(user, 3);

        order.cancel(user).unwrap();

        let stamp = order.deleted.unwrap();
        assert_eq!(stamp.deleted_by, user);
        assert!(order.order_items.iter().all(|i| i.deleted == Some(stamp)));
    }

    #[test]
    fn cancelling_twice_conflicts() {
        let user = Uuid::new_v4();
        let mut order = order_with_items(user, 1);

        order.cancel(user).unwrap();
        assert!(matches!(order.cancel(user), Err(AppError::Conflict(_))));
    }
}
