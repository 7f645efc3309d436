use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    dto::{auth::RegisterRequest, users::NamePayload},
    error::{AppError, AppResult},
    models::{Cart, Page, SoftDelete, User},
    repositories::UserRepository,
    routes::params::{PageRequest, UserSortField},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Registers a user together with an empty cart.
    async fn create(&self, payload: RegisterRequest) -> AppResult<User>;

    async fn get_by_username(&self, username: &str) -> AppResult<User>;

    async fn get_by_id(&self, user_id: Uuid) -> AppResult<User>;

    async fn update_name(
        &self,
        payload: NamePayload,
        user_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<User>;

    async fn delete_by_id(&self, user_id: Uuid, deleter_id: Uuid) -> AppResult<User>;

    async fn get_all(&self, page: PageRequest<UserSortField>) -> AppResult<Page<User>>;
}

pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    async fn get_live(&self, user_id: Uuid) -> AppResult<User> {
        let user = self.repository.get_by_id(user_id).await?;
        if user.is_deleted() {
            return Err(AppError::not_found("User"));
        }
        Ok(user)
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[tracing::instrument(skip_all, fields(username = %payload.user_name))]
    async fn create(&self, payload: RegisterRequest) -> AppResult<User> {
        if self.repository.exists_by_username(&payload.user_name).await? {
            return Err(AppError::conflict("username already taken"));
        }
        if self.repository.exists_by_email(&payload.email).await? {
            return Err(AppError::conflict("email already registered"));
        }

        let user = User::new_from_payload(payload)?;
        let cart = Cart::for_user(&user);
        let user = self.repository.create(user, cart).await?;

        tracing::info!(user_id = %user.id, cart_id = %user.cart_id, "user registered");
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.repository.get_by_username(username).await
    }

    async fn get_by_id(&self, user_id: Uuid) -> AppResult<User> {
        self.repository.get_by_id(user_id).await
    }

    #[tracing::instrument(skip(self, payload))]
    async fn update_name(
        &self,
        payload: NamePayload,
        user_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<User> {
        let mut user = self.get_live(user_id).await?;
        user.update_name(payload.name, actor_id);
        self.repository.update(user).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(&self, user_id: Uuid, deleter_id: Uuid) -> AppResult<User> {
        let mut user = self.repository.get_by_id(user_id).await?;
        user.soft_delete(deleter_id)?;
        user.audit.touch(deleter_id);
        self.repository.soft_delete(user).await
    }

    async fn get_all(&self, page: PageRequest<UserSortField>) -> AppResult<Page<User>> {
        self.repository.get_all(page).await
    }
}
