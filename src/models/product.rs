use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::products::CreateProductRequest;

use super::{Audit, Tombstone};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
    pub price: f64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Tombstone>,
}

impl Product {
    pub fn new_from_payload(load: CreateProductRequest, actor: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: load.name,
            stock: load.stock,
            price: load.price,
            audit: Audit::new(actor),
            deleted: None,
        }
    }

    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}
