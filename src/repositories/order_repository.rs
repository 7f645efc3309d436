use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    db::Db,
    entity::{
        order_items::{self, Entity as OrderItems, Model as OrderItemModel},
        orders::{self, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus, Page},
    routes::params::{OrderSortField, PageRequest},
};

use super::{audit_from_columns, db_error, tombstone_columns, tombstone_from_columns};

/// Listing filter. `user_id: None` means every user and is only ever
/// passed for admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub cancelled: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order row and all attached items in one transaction.
    async fn create(&self, order: Order) -> AppResult<Order>;

    /// Orders without their items.
    async fn get_all(
        &self,
        page: PageRequest<OrderSortField>,
        filter: OrderFilter,
    ) -> AppResult<Page<Order>>;

    async fn get_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;

    /// Cancelled orders are returned too.
    async fn get_by_id(&self, order_id: Uuid) -> AppResult<Order>;

    /// Persists the tombstones of an already cancelled aggregate. The order
    /// row and every item row are written in one transaction; if any row is
    /// missing the whole write is rolled back.
    async fn cancel(&self, order: Order) -> AppResult<Order>;
}

#[derive(Clone)]
pub struct PgOrderRepository {
    db: Db,
}

impl PgOrderRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: Order) -> AppResult<Order> {
        let txn = self.db.begin().await.map_err(db_error("Order"))?;

        orders::ActiveModel::from(&order)
            .insert(&txn)
            .await
            .map_err(db_error("Order"))?;

        if !order.order_items.is_empty() {
            OrderItems::insert_many(order.order_items.iter().map(order_items::ActiveModel::from))
                .exec(&txn)
                .await
                .map_err(db_error("Order item"))?;
        }

        txn.commit().await.map_err(db_error("Order"))?;
        Ok(order)
    }

    async fn get_all(
        &self,
        page: PageRequest<OrderSortField>,
        filter: OrderFilter,
    ) -> AppResult<Page<Order>> {
        let mut condition = Condition::all();
        if let Some(user_id) = filter.user_id {
            condition = condition.add(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(orders::Column::Status.eq(status.as_str()));
        }
        match filter.cancelled {
            Some(true) => condition = condition.add(orders::Column::DeletedAt.is_not_null()),
            Some(false) => condition = condition.add(orders::Column::DeletedAt.is_null()),
            None => {}
        }

        let finder = Orders::find()
            .filter(condition)
            .order_by(page.field.column(), page.sort.into());

        let total = finder
            .clone()
            .count(&self.db.read)
            .await
            .map_err(db_error("Order"))?;

        let items = finder
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db.read)
            .await
            .map_err(db_error("Order"))?
            .into_iter()
            .map(order_from_entity)
            .collect();

        Ok(Page { items, total })
    }

    async fn get_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(&self.db.read)
            .await
            .map_err(db_error("Order item"))?
            .into_iter()
            .map(order_item_from_entity)
            .collect();
        Ok(items)
    }

    async fn get_by_id(&self, order_id: Uuid) -> AppResult<Order> {
        Orders::find_by_id(order_id)
            .one(&self.db.read)
            .await
            .map_err(db_error("Order"))?
            .map(order_from_entity)
            .ok_or_else(|| AppError::not_found("Order"))
    }

    async fn cancel(&self, order: Order) -> AppResult<Order> {
        let txn = self.db.begin().await.map_err(db_error("Order"))?;

        // Only a live row may be stamped; a concurrent cancel loses here.
        let (deleted_at, deleted_by) = tombstone_columns(order.deleted);
        let stamped = Orders::update_many()
            .set(orders::ActiveModel {
                updated_at: Set(order.audit.updated_at.into()),
                updated_by: Set(order.audit.updated_by),
                deleted_at: Set(deleted_at),
                deleted_by: Set(deleted_by),
                ..Default::default()
            })
            .filter(orders::Column::Id.eq(order.id))
            .filter(orders::Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(db_error("Order"))?;
        if stamped.rows_affected == 0 {
            tracing::warn!(order_id = %order.id, "order already cancelled or gone");
            return Err(AppError::conflict("Order already deleted"));
        }

        for item in &order.order_items {
            let (deleted_at, deleted_by) = tombstone_columns(item.deleted);
            order_items::ActiveModel {
                id: Set(item.id),
                updated_at: Set(item.audit.updated_at.into()),
                updated_by: Set(item.audit.updated_by),
                deleted_at: Set(deleted_at),
                deleted_by: Set(deleted_by),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(not_updated("Order item"))?;
        }

        txn.commit().await.map_err(db_error("Order"))?;
        Ok(order)
    }
}

fn not_updated(entity: &'static str) -> impl Fn(DbErr) -> AppError {
    move |err| match err {
        DbErr::RecordNotUpdated => {
            tracing::error!(entity, "row vanished during cancel, rolling back");
            AppError::not_found(entity)
        }
        other => db_error(entity)(other),
    }
}

impl From<&Order> for orders::ActiveModel {
    fn from(order: &Order) -> Self {
        let (deleted_at, deleted_by) = tombstone_columns(order.deleted);
        orders::ActiveModel {
            id: Set(order.id),
            user_id: Set(order.user_id),
            total_price: Set(order.total_price),
            status: Set(order.status.as_str().to_string()),
            created_at: Set(order.audit.created_at.into()),
            created_by: Set(order.audit.created_by),
            updated_at: Set(order.audit.updated_at.into()),
            updated_by: Set(order.audit.updated_by),
            deleted_at: Set(deleted_at),
            deleted_by: Set(deleted_by),
        }
    }
}

impl From<&OrderItem> for order_items::ActiveModel {
    fn from(item: &OrderItem) -> Self {
        let (deleted_at, deleted_by) = tombstone_columns(item.deleted);
        order_items::ActiveModel {
            id: Set(item.id),
            order_id: Set(item.order_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            price: Set(item.price),
            created_at: Set(item.audit.created_at.into()),
            created_by: Set(item.audit.created_by),
            updated_at: Set(item.audit.updated_at.into()),
            updated_by: Set(item.audit.updated_by),
            deleted_at: Set(deleted_at),
            deleted_by: Set(deleted_by),
        }
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    let status = model.status.parse().unwrap_or_else(|_| {
        tracing::warn!(order_id = %model.id, status = %model.status, "unknown stored order status");
        OrderStatus::default()
    });
    Order {
        id: model.id,
        user_id: model.user_id,
        total_price: model.total_price,
        status,
        order_items: Vec::new(),
        audit: audit_from_columns(
            model.created_at,
            model.created_by,
            model.updated_at,
            model.updated_by,
        ),
        deleted: tombstone_from_columns(model.deleted_at, model.deleted_by),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        audit: audit_from_columns(
            model.created_at,
            model.created_by,
            model.updated_at,
            model.updated_by,
        ),
        deleted: tombstone_from_columns(model.deleted_at, model.deleted_by),
    }
}
