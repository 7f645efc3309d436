use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    db::Db,
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::{Page, Product},
    routes::params::{PageRequest, ProductSortField},
};

use super::{audit_from_columns, db_error, tombstone_columns, tombstone_from_columns};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> AppResult<Product>;

    /// `title` is matched case-insensitively anywhere in the product name.
    async fn get_all(
        &self,
        page: PageRequest<ProductSortField>,
        title: Option<String>,
    ) -> AppResult<Page<Product>>;

    async fn exists_by_id(&self, id: Uuid) -> AppResult<bool>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Product>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    db: Db,
}

impl PgProductRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> AppResult<Product> {
        let (deleted_at, deleted_by) = tombstone_columns(product.deleted);
        let active = ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            stock: Set(product.stock),
            price: Set(product.price),
            created_at: Set(product.audit.created_at.into()),
            created_by: Set(product.audit.created_by),
            updated_at: Set(product.audit.updated_at.into()),
            updated_by: Set(product.audit.updated_by),
            deleted_at: Set(deleted_at),
            deleted_by: Set(deleted_by),
        };

        let txn = self.db.begin().await.map_err(db_error("Product"))?;
        let row = active.insert(&txn).await.map_err(db_error("Product"))?;
        txn.commit().await.map_err(db_error("Product"))?;

        Ok(product_from_entity(row))
    }

    async fn get_all(
        &self,
        page: PageRequest<ProductSortField>,
        title: Option<String>,
    ) -> AppResult<Page<Product>> {
        let mut condition = Condition::all().add(Column::DeletedAt.is_null());
        if let Some(title) = title.as_ref().filter(|t| !t.is_empty()) {
            condition = condition.add(Expr::col(Column::Name).ilike(contains_pattern(title)));
        }

        let finder = Products::find()
            .filter(condition)
            .order_by(page.field.column(), page.sort.into());

        let total = finder
            .clone()
            .count(&self.db.read)
            .await
            .map_err(db_error("Product"))?;

        let items = finder
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db.read)
            .await
            .map_err(db_error("Product"))?
            .into_iter()
            .map(product_from_entity)
            .collect();

        Ok(Page { items, total })
    }

    async fn exists_by_id(&self, id: Uuid) -> AppResult<bool> {
        let count = Products::find()
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .count(&self.db.read)
            .await
            .map_err(db_error("Product"))?;
        Ok(count > 0)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Product> {
        Products::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db.read)
            .await
            .map_err(db_error("Product"))?
            .map(product_from_entity)
            .ok_or_else(|| AppError::not_found("Product"))
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        stock: model.stock,
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

/// `%title%` with LIKE wildcards in `title` matched literally
/// (Postgres uses `\` as the default escape character).
fn contains_pattern(title: &str) -> String {
    let mut pattern = String::with_capacity(title.len() + 2);
    pattern.push('%');
    for c in title.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn title_filter_wraps_plain_text() {
        assert_eq!(contains_pattern("Mug"), "%Mug%");
    }

    #[test]
    fn title_filter_escapes_wildcards() {
        assert_eq!(contains_pattern("_"), r"%\_%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
