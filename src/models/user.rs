use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::auth::RegisterRequest,
    error::{AppError, AppResult},
    utils::{email, password},
};

use super::{Audit, Role, SoftDelete, Tombstone};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub cart_id: Uuid,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Tombstone>,
}

impl User {
    /// Builds a new account with a hashed password and a freshly allocated cart id.
    pub fn new_from_payload(load: RegisterRequest) -> AppResult<Self> {
        if !email::is_valid(&load.email) {
            return Err(AppError::bad_request("invalid email"));
        }
        let id = Uuid::new_v4();
        Ok(Self {
            id,
            email: load.email,
            username: load.user_name,
            name: load.name,
            password: password::hash_password(&load.password)?,
            role: Role::from_str_lossy(&load.role),
            cart_id: Uuid::new_v4(),
            audit: Audit::new(id),
            deleted: None,
        })
    }

    pub fn validate_password(&self, candidate: &str) -> AppResult<()> {
        password::verify_password(&self.password, candidate)
    }

    pub fn update_name(&mut self, name: String, actor: Uuid) {
        self.name = name;
        self.audit.touch(actor);
    }
}

impl SoftDelete for User {
    const ENTITY: &'static str = "User";

    fn tombstone(&self) -> Option<&Tombstone> {
        self.deleted.as_ref()
    }

    fn tombstone_mut(&mut self) -> &mut Option<Tombstone> {
        &mut self.deleted
    }
}
