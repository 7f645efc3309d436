use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    db::Db,
    entity::{
        cart_items::{self, Entity as CartItems, Model as CartItemModel},
        carts::{self, Entity as Carts, Model as CartModel},
    },
    error::{AppError, AppResult},
    models::{Cart, CartItem, Page},
    routes::params::{CartSortField, PageRequest},
};

use super::{audit_from_columns, db_error, tombstone_columns, tombstone_from_columns};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn cart_exists(&self, cart_id: Uuid) -> AppResult<bool>;

    /// The cart row alone; items are loaded separately.
    async fn get_cart(&self, cart_id: Uuid) -> AppResult<Cart>;

    async fn get_all_carts(&self, page: PageRequest<CartSortField>) -> AppResult<Page<Cart>>;

    async fn get_cart_items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>>;

    async fn cart_item_exists(&self, item_id: Uuid) -> AppResult<bool>;

    async fn get_cart_item(&self, item_id: Uuid) -> AppResult<CartItem>;

    /// The live item for `product_id` in `cart_id`, if the product is already in the cart.
    async fn get_cart_item_by_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CartItem>>;

    async fn create_item(&self, item: CartItem) -> AppResult<CartItem>;

    async fn update_item(&self, item: CartItem) -> AppResult<CartItem>;

    /// Removes the given items from `cart_id` in one transaction. If any id
    /// is not a live item of that cart nothing is removed.
    async fn delete_items(&self, cart_id: Uuid, item_ids: Vec<Uuid>) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgCartRepository {
    db: Db,
}

impl PgCartRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    fn live_item() -> Condition {
        Condition::all().add(cart_items::Column::DeletedAt.is_null())
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn cart_exists(&self, cart_id: Uuid) -> AppResult<bool> {
        let count = Carts::find()
            .filter(carts::Column::Id.eq(cart_id))
            .filter(carts::Column::DeletedAt.is_null())
            .count(&self.db.read)
            .await
            .map_err(db_error("Cart"))?;
        Ok(count > 0)
    }

    async fn get_cart(&self, cart_id: Uuid) -> AppResult<Cart> {
        Carts::find_by_id(cart_id)
            .filter(carts::Column::DeletedAt.is_null())
            .one(&self.db.read)
            .await
            .map_err(db_error("Cart"))?
            .map(cart_from_entity)
            .ok_or_else(|| AppError::not_found("Cart"))
    }

    async fn get_all_carts(&self, page: PageRequest<CartSortField>) -> AppResult<Page<Cart>> {
        let finder = Carts::find()
            .filter(carts::Column::DeletedAt.is_null())
            .order_by(page.field.column(), page.sort.into());

        let total = finder
            .clone()
            .count(&self.db.read)
            .await
            .map_err(db_error("Cart"))?;

        let items = finder
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db.read)
            .await
            .map_err(db_error("Cart"))?
            .into_iter()
            .map(cart_from_entity)
            .collect();

        Ok(Page { items, total })
    }

    async fn get_cart_items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
        let items = CartItems::find()
            .filter(Self::live_item().add(cart_items::Column::CartId.eq(cart_id)))
            .order_by_asc(cart_items::Column::CreatedAt)
            .all(&self.db.read)
            .await
            .map_err(db_error("Cart item"))?
            .into_iter()
            .map(cart_item_from_entity)
            .collect();
        Ok(items)
    }

    async fn cart_item_exists(&self, item_id: Uuid) -> AppResult<bool> {
        let count = CartItems::find()
            .filter(Self::live_item().add(cart_items::Column::Id.eq(item_id)))
            .count(&self.db.read)
            .await
            .map_err(db_error("Cart item"))?;
        Ok(count > 0)
    }

    async fn get_cart_item(&self, item_id: Uuid) -> AppResult<CartItem> {
        CartItems::find()
            .filter(Self::live_item().add(cart_items::Column::Id.eq(item_id)))
            .one(&self.db.read)
            .await
            .map_err(db_error("Cart item"))?
            .map(cart_item_from_entity)
            .ok_or_else(|| AppError::not_found("Cart item"))
    }

    async fn get_cart_item_by_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CartItem>> {
        let item = CartItems::find()
            .filter(
                Self::live_item()
                    .add(cart_items::Column::CartId.eq(cart_id))
                    .add(cart_items::Column::ProductId.eq(product_id)),
            )
            .one(&self.db.read)
            .await
            .map_err(db_error("Cart item"))?
            .map(cart_item_from_entity);
        Ok(item)
    }

    async fn create_item(&self, item: CartItem) -> AppResult<CartItem> {
        let txn = self.db.begin().await.map_err(db_error("Cart item"))?;
        let row = cart_items::ActiveModel::from(&item)
            .insert(&txn)
            .await
            .map_err(db_error("Cart item"))?;
        txn.commit().await.map_err(db_error("Cart item"))?;
        Ok(cart_item_from_entity(row))
    }

    async fn update_item(&self, item: CartItem) -> AppResult<CartItem> {
        let txn = self.db.begin().await.map_err(db_error("Cart item"))?;
        let row = cart_items::ActiveModel::from(&item)
            .update(&txn)
            .await
            .map_err(|err| match err {
                sea_orm::DbErr::RecordNotUpdated => AppError::not_found("Cart item"),
                other => db_error("Cart item")(other),
            })?;
        txn.commit().await.map_err(db_error("Cart item"))?;
        Ok(cart_item_from_entity(row))
    }

    async fn delete_items(&self, cart_id: Uuid, item_ids: Vec<Uuid>) -> AppResult<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let expected = item_ids.len() as u64;

        let txn = self.db.begin().await.map_err(db_error("Cart item"))?;
        let result = CartItems::delete_many()
            .filter(
                Self::live_item()
                    .add(cart_items::Column::CartId.eq(cart_id))
                    .add(cart_items::Column::Id.is_in(item_ids)),
            )
            .exec(&txn)
            .await
            .map_err(db_error("Cart item"))?;

        if result.rows_affected != expected {
            // dropping `txn` rolls the partial delete back
            return Err(AppError::not_found("Cart item"));
        }
        txn.commit().await.map_err(db_error("Cart item"))?;
        Ok(())
    }
}

impl From<&CartItem> for cart_items::ActiveModel {
    fn from(item: &CartItem) -> Self {
        let (deleted_at, deleted_by) = tombstone_columns(item.deleted);
        cart_items::ActiveModel {
            id: Set(item.id),
            cart_id: Set(item.cart_id),
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

fn cart_from_entity(model: CartModel) -> Cart {
    Cart {
        id: model.id,
        user_id: model.user_id,
        cart_items: Vec::new(),
        audit: audit_from_columns(
            model.created_at,
            model.created_by,
            model.updated_at,
            model.updated_by,
        ),
        deleted: tombstone_from_columns(model.deleted_at, model.deleted_by),
    }
}

fn cart_item_from_entity(model: CartItemModel) -> CartItem {
    CartItem {
        id: model.id,
        cart_id: model.cart_id,
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
