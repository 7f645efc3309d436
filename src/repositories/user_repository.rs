use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    db::Db,
    entity::{
        carts,
        users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::{Cart, Page, Role, User},
    routes::params::{PageRequest, UserSortField},
};

use super::{audit_from_columns, db_error, tombstone_columns, tombstone_from_columns};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user row and its cart row in one transaction.
    async fn create(&self, user: User, cart: Cart) -> AppResult<User>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Soft-deleted users are returned too; callers decide what to do with them.
    async fn get_by_id(&self, id: Uuid) -> AppResult<User>;

    async fn get_by_username(&self, username: &str) -> AppResult<User>;

    /// Writes name, audit and tombstone columns back.
    async fn update(&self, user: User) -> AppResult<User>;

    /// Stamps the tombstone only if the row is still live; otherwise `Conflict`.
    async fn soft_delete(&self, user: User) -> AppResult<User>;

    async fn get_all(&self, page: PageRequest<UserSortField>) -> AppResult<Page<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: Db,
}

impl PgUserRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn exists(&self, condition: Condition) -> AppResult<bool> {
        let count = Users::find()
            .filter(condition)
            .count(&self.db.read)
            .await
            .map_err(db_error("User"))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User, cart: Cart) -> AppResult<User> {
        let txn = self.db.begin().await.map_err(db_error("User"))?;

        let row = ActiveModel::from(&user)
            .insert(&txn)
            .await
            .map_err(db_error("User"))?;
        carts::ActiveModel {
            id: Set(cart.id),
            user_id: Set(cart.user_id),
            created_at: Set(cart.audit.created_at.into()),
            created_by: Set(cart.audit.created_by),
            updated_at: Set(cart.audit.updated_at.into()),
            updated_by: Set(cart.audit.updated_by),
            deleted_at: Set(None),
            deleted_by: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(db_error("Cart"))?;

        txn.commit().await.map_err(db_error("User"))?;
        Ok(user_from_entity(row))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        self.exists(Condition::all().add(Column::Username.eq(username)))
            .await
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        self.exists(Condition::all().add(Column::Email.eq(email))).await
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        Users::find_by_id(id)
            .one(&self.db.read)
            .await
            .map_err(db_error("User"))?
            .map(user_from_entity)
            .ok_or_else(|| AppError::not_found("User"))
    }

    async fn get_by_username(&self, username: &str) -> AppResult<User> {
        Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db.read)
            .await
            .map_err(db_error("User"))?
            .map(user_from_entity)
            .ok_or_else(|| AppError::not_found("User"))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let txn = self.db.begin().await.map_err(db_error("User"))?;
        let row = ActiveModel::from(&user)
            .update(&txn)
            .await
            .map_err(|err| match err {
                sea_orm::DbErr::RecordNotUpdated => AppError::not_found("User"),
                other => db_error("User")(other),
            })?;
        txn.commit().await.map_err(db_error("User"))?;
        Ok(user_from_entity(row))
    }

    async fn soft_delete(&self, user: User) -> AppResult<User> {
        let txn = self.db.begin().await.map_err(db_error("User"))?;
        let (deleted_at, deleted_by) = tombstone_columns(user.deleted);
        let stamped = Users::update_many()
            .set(ActiveModel {
                updated_at: Set(user.audit.updated_at.into()),
                updated_by: Set(user.audit.updated_by),
                deleted_at: Set(deleted_at),
                deleted_by: Set(deleted_by),
                ..Default::default()
            })
            .filter(Column::Id.eq(user.id))
            .filter(Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(db_error("User"))?;
        if stamped.rows_affected == 0 {
            return Err(AppError::conflict("User already deleted"));
        }
        txn.commit().await.map_err(db_error("User"))?;
        Ok(user)
    }

    async fn get_all(&self, page: PageRequest<UserSortField>) -> AppResult<Page<User>> {
        let finder = Users::find()
            .filter(Column::DeletedAt.is_null())
            .order_by(page.field.column(), page.sort.into());

        let total = finder
            .clone()
            .count(&self.db.read)
            .await
            .map_err(db_error("User"))?;

        let items = finder
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db.read)
            .await
            .map_err(db_error("User"))?
            .into_iter()
            .map(user_from_entity)
            .collect();

        Ok(Page { items, total })
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        let (deleted_at, deleted_by) = tombstone_columns(user.deleted);
        ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            name: Set(user.name.clone()),
            password: Set(user.password.clone()),
            role: Set(user.role.as_str().to_string()),
            cart_id: Set(user.cart_id),
            created_at: Set(user.audit.created_at.into()),
            created_by: Set(user.audit.created_by),
            updated_at: Set(user.audit.updated_at.into()),
            updated_by: Set(user.audit.updated_by),
            deleted_at: Set(deleted_at),
            deleted_by: Set(deleted_by),
        }
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        name: model.name,
        password: model.password,
        role: Role::from_str_lossy(&model.role),
        cart_id: model.cart_id,
        audit: audit_from_columns(
            model.created_at,
            model.created_by,
            model.updated_at,
            model.updated_by,
        ),
        deleted: tombstone_from_columns(model.deleted_at, model.deleted_by),
    }
}
