use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct NamePayload {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
