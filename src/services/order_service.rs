use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderItemPayload, OrderPayload, Page, Role},
    repositories::{OrderFilter, OrderRepository},
    routes::params::{OrderSortField, PageRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn create_order(
        &self,
        payload: OrderPayload,
        items: Vec<OrderItemPayload>,
    ) -> AppResult<Order>;

    /// Owner or admin only. Soft-deletes the order and all its items.
    async fn cancel_order(&self, order_id: Uuid, user_id: Uuid, role: Role) -> AppResult<Order>;

    /// Non-admins only ever see their own orders, whatever `filter.user_id` says.
    async fn get_all(
        &self,
        page: PageRequest<OrderSortField>,
        filter: OrderFilter,
        user_id: Uuid,
        role: Role,
    ) -> AppResult<Page<Order>>;

    async fn get_by_id(&self, order_id: Uuid, user_id: Uuid, role: Role) -> AppResult<Order>;
}

pub struct OrderServiceImpl {
    repository: Arc<dyn OrderRepository>,
}

impl OrderServiceImpl {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Loads an order with its items, enforcing owner-or-admin access.
    async fn load_for(&self, order_id: Uuid, user_id: Uuid, role: Role) -> AppResult<Order> {
        let order = self.repository.get_by_id(order_id).await?;
        if !order.is_owned_by(user_id) && role != Role::Admin {
            tracing::warn!(%order_id, %user_id, "order access denied");
            return Err(AppError::unauthorized("not allowed to access this order"));
        }
        let items = self.repository.get_items(order_id).await?;
        Ok(order.attach_items(items))
    }
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    #[tracing::instrument(skip_all, fields(user_id = %payload.user_id, items = items.len()))]
    async fn create_order(
        &self,
        payload: OrderPayload,
        items: Vec<OrderItemPayload>,
    ) -> AppResult<Order> {
        let order = Order::new_from_payload(payload);
        let order_items = items
            .into_iter()
            .map(|item| OrderItem::new_from_payload(item, order.id))
            .collect();
        let order = self.repository.create(order.attach_items(order_items)).await?;

        tracing::info!(order_id = %order.id, total = order.total_price, "order created");
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_order(&self, order_id: Uuid, user_id: Uuid, role: Role) -> AppResult<Order> {
        let mut order = self.load_for(order_id, user_id, role).await?;
        order.cancel(user_id)?;
        self.repository.cancel(order).await
    }

    #[tracing::instrument(skip(self, page))]
    async fn get_all(
        &self,
        page: PageRequest<OrderSortField>,
        mut filter: OrderFilter,
        user_id: Uuid,
        role: Role,
    ) -> AppResult<Page<Order>> {
        if role != Role::Admin {
            filter.user_id = Some(user_id);
        }

        let Page { items, total } = self.repository.get_all(page, filter).await?;
        // one round-trip per order for its items
        let mut orders = Vec::with_capacity(items.len());
        for order in items {
            let order_items = self.repository.get_items(order.id).await?;
            orders.push(order.attach_items(order_items));
        }

        Ok(Page {
            items: orders,
            total,
        })
    }

    async fn get_by_id(&self, order_id: Uuid, user_id: Uuid, role: Role) -> AppResult<Order> {
        self.load_for(order_id, user_id, role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{OrderStatus, SoftDelete},
        repositories::MockOrderRepository,
    };

    fn pending_order(user_id: Uuid) -> Order {
        Order::new_from_payload(OrderPayload {
            user_id,
            total_price: 30.0,
            status: OrderStatus::Pending,
        })
    }

    fn items_for(order: &Order, n: usize) -> Vec<OrderItem> {
        (0..n)
            .map(|_| {
                OrderItem::new_from_payload(
                    OrderItemPayload {
                        product_id: Uuid::new_v4(),
                        user_id: order.user_id,
                        quantity: 1,
                        price: 15.0,
                    },
                    order.id,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn create_order_attaches_items_to_new_order() {
        let user = Uuid::new_v4();
        let mut repo = MockOrderRepository::new();
        repo.expect_create()
            .withf(|order| {
                order.order_items.len() == 2
                    && order.order_items.iter().all(|i| i.order_id == order.id)
            })
            .times(1)
            .returning(Ok);

        let service = OrderServiceImpl::new(Arc::new(repo));
        let payload = |price| OrderItemPayload {
            product_id: Uuid::new_v4(),
            user_id: user,
            quantity: 1,
            price,
        };
        let order = service
            .create_order(
                OrderPayload {
                    user_id: user,
                    total_price: 30.0,
                    status: OrderStatus::Pending,
                },
                vec![payload(10.0), payload(20.0)],
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, 30.0);
    }

    #[tokio::test]
    async fn non_owner_cannot_cancel() {
        let order = pending_order(Uuid::new_v4());
        let order_id = order.id;
        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(order.clone()));
        repo.expect_cancel().never();

        let service = OrderServiceImpl::new(Arc::new(repo));
        let err = service
            .cancel_order(order_id, Uuid::new_v4(), Role::Trainee)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn owner_cancel_tombstones_order_and_every_item() {
        let owner = Uuid::new_v4();
        let order = pending_order(owner);
        let order_id = order.id;
        let items = items_for(&order, 3);

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(order.clone()));
        repo.expect_get_items()
            .returning(move |_| Ok(items.clone()));
        repo.expect_cancel()
            .withf(move |order| {
                order.deleted.map(|t| t.deleted_by) == Some(owner)
                    && order.order_items.len() == 3
                    && order.order_items.iter().all(|i| i.deleted == order.deleted)
            })
            .times(1)
            .returning(Ok);

        let service = OrderServiceImpl::new(Arc::new(repo));
        let cancelled = service
            .cancel_order(order_id, owner, Role::Trainee)
            .await
            .unwrap();

        assert!(cancelled.is_deleted());
    }

    #[tokio::test]
    async fn admin_may_cancel_any_order() {
        let order = pending_order(Uuid::new_v4());
        let order_id = order.id;
        let admin = Uuid::new_v4();

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(order.clone()));
        repo.expect_get_items().returning(|_| Ok(Vec::new()));
        repo.expect_cancel().times(1).returning(Ok);

        let service = OrderServiceImpl::new(Arc::new(repo));
        let cancelled = service
            .cancel_order(order_id, admin, Role::Admin)
            .await
            .unwrap();

        assert_eq!(cancelled.deleted.unwrap().deleted_by, admin);
    }

    #[tokio::test]
    async fn cancelling_twice_conflicts() {
        let owner = Uuid::new_v4();
        let mut order = pending_order(owner);
        order.cancel(owner).unwrap();
        let order_id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(order.clone()));
        repo.expect_get_items().returning(|_| Ok(Vec::new()));
        repo.expect_cancel().never();

        let service = OrderServiceImpl::new(Arc::new(repo));
        let err = service
            .cancel_order(order_id, owner, Role::Trainee)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn trainee_listing_is_pinned_to_own_user_id() {
        let caller = Uuid::new_v4();
        let someone_else = Uuid::new_v4();

        let mut repo = MockOrderRepository::new();
        repo.expect_get_all()
            .withf(move |_, filter| filter.user_id == Some(caller))
            .times(1)
            .returning(|_, _| {
                Ok(Page {
                    items: Vec::new(),
                    total: 0,
                })
            });

        let service = OrderServiceImpl::new(Arc::new(repo));
        let filter = OrderFilter {
            user_id: Some(someone_else),
            ..Default::default()
        };
        service
            .get_all(PageRequest::default(), filter, caller, Role::Trainee)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn admin_listing_keeps_filter_and_attaches_items() {
        let admin = Uuid::new_v4();
        let order = pending_order(Uuid::new_v4());
        let items = items_for(&order, 2);

        let mut repo = MockOrderRepository::new();
        repo.expect_get_all()
            .withf(|_, filter| filter.user_id.is_none() && filter.cancelled == Some(false))
            .returning(move |_, _| {
                Ok(Page {
                    items: vec![order.clone()],
                    total: 1,
                })
            });
        repo.expect_get_items()
            .times(1)
            .returning(move |_| Ok(items.clone()));

        let service = OrderServiceImpl::new(Arc::new(repo));
        let filter = OrderFilter {
            cancelled: Some(false),
            ..Default::default()
        };
        let page = service
            .get_all(PageRequest::default(), filter, admin, Role::Admin)
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].order_items.len(), 2);
    }
}
