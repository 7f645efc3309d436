use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CheckoutRequest},
    error::{AppError, AppResult},
    models::{Cart, CartItem, Order, OrderItemPayload, OrderPayload, OrderStatus, Page},
    repositories::CartRepository,
    routes::params::{CartSortField, PageRequest},
    services::{order_service::OrderService, product_service::ProductService},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Adds a product to the cart, merging into the existing line when the
    /// product is already there.
    async fn add_to_cart(
        &self,
        payload: AddToCartRequest,
        user_id: Uuid,
        cart_id: Uuid,
    ) -> AppResult<CartItem>;

    /// Turns the selected cart items into one pending order and removes
    /// them from the cart.
    async fn checkout(
        &self,
        payload: CheckoutRequest,
        cart_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Order>;

    async fn get_cart(&self, cart_id: Uuid) -> AppResult<Cart>;

    async fn get_cart_items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>>;

    async fn get_all_carts(&self, page: PageRequest<CartSortField>) -> AppResult<Page<Cart>>;
}

pub struct CartServiceImpl {
    repository: Arc<dyn CartRepository>,
    products: Arc<dyn ProductService>,
    orders: Arc<dyn OrderService>,
}

impl CartServiceImpl {
    pub fn new(
        repository: Arc<dyn CartRepository>,
        products: Arc<dyn ProductService>,
        orders: Arc<dyn OrderService>,
    ) -> Self {
        Self {
            repository,
            products,
            orders,
        }
    }

    async fn ensure_cart(&self, cart_id: Uuid) -> AppResult<()> {
        if !self.repository.cart_exists(cart_id).await? {
            return Err(AppError::not_found("Cart"));
        }
        Ok(())
    }
}

#[async_trait]
impl CartService for CartServiceImpl {
    #[tracing::instrument(skip(self, payload), fields(product_id = %payload.product_id, quantity = payload.quantity))]
    async fn add_to_cart(
        &self,
        payload: AddToCartRequest,
        user_id: Uuid,
        cart_id: Uuid,
    ) -> AppResult<CartItem> {
        self.ensure_cart(cart_id).await?;

        let product = self.products.get_by_id(payload.product_id).await?;
        if !product.has_stock_for(payload.quantity) {
            return Err(AppError::bad_request("not enough stock available"));
        }

        match self
            .repository
            .get_cart_item_by_product(cart_id, payload.product_id)
            .await?
        {
            Some(mut item) => {
                item.merge(payload.quantity, product.price, user_id)?;
                self.repository.update_item(item).await
            }
            None => {
                let item = CartItem::new_from_payload(&payload, cart_id, user_id, product.price)?;
                self.repository.create_item(item).await
            }
        }
    }

    #[tracing::instrument(skip(self, payload), fields(items = payload.items.len()))]
    async fn checkout(
        &self,
        payload: CheckoutRequest,
        cart_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Order> {
        if payload.items.is_empty() {
            return Err(AppError::bad_request("at least one cart item is required"));
        }
        let mut seen = HashSet::with_capacity(payload.items.len());
        if !payload.items.iter().all(|id| seen.insert(*id)) {
            return Err(AppError::bad_request("duplicate cart item in checkout"));
        }

        self.ensure_cart(cart_id).await?;

        let mut total_price = 0.0;
        let mut order_items = Vec::with_capacity(payload.items.len());
        for item_id in &payload.items {
            if !self.repository.cart_item_exists(*item_id).await? {
                return Err(AppError::not_found("Cart item"));
            }
            let item = self.repository.get_cart_item(*item_id).await?;
            if item.cart_id != cart_id {
                tracing::warn!(%item_id, %cart_id, "cart item belongs to another cart");
                return Err(AppError::not_found("Cart item"));
            }
            if !self.products.exists_by_id(item.product_id).await? {
                return Err(AppError::not_found("Product"));
            }

            total_price += item.price;
            order_items.push(OrderItemPayload {
                product_id: item.product_id,
                user_id,
                quantity: item.quantity,
                price: item.price,
            });
        }

        let order = self
            .orders
            .create_order(
                OrderPayload {
                    user_id,
                    total_price,
                    status: OrderStatus::Pending,
                },
                order_items,
            )
            .await?;

        // Second transaction. The order is already committed, so a failure
        // here leaves the purchased items in the cart.
        if let Err(err) = self.repository.delete_items(cart_id, payload.items).await {
            tracing::error!(order_id = %order.id, %cart_id, error = %err, "order created but cart items were not removed");
            return Err(err);
        }

        Ok(order)
    }

    async fn get_cart(&self, cart_id: Uuid) -> AppResult<Cart> {
        let cart = self.repository.get_cart(cart_id).await?;
        let items = self.repository.get_cart_items(cart_id).await?;
        Ok(cart.attach_items(items))
    }

    async fn get_cart_items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
        self.ensure_cart(cart_id).await?;
        self.repository.get_cart_items(cart_id).await
    }

    async fn get_all_carts(&self, page: PageRequest<CartSortField>) -> AppResult<Page<Cart>> {
        self.repository.get_all_carts(page).await
    }
}
