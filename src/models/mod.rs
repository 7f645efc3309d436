use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

mod cart;
mod order;
mod product;
mod user;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderItem, OrderItemPayload, OrderPayload};
pub use product::Product;
pub use user::User;

/// Creation/modification stamps carried by every row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
}

impl Audit {
    pub fn new(actor: Uuid) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: actor,
            updated_at: now,
            updated_by: actor,
        }
    }

    pub fn touch(&mut self, actor: Uuid) {
        self.updated_at = Utc::now();
        self.updated_by = actor;
    }
}

/// Soft-delete marker. Present means deleted; the pair is always set together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    pub deleted_at: DateTime<Utc>,
    pub deleted_by: Uuid,
}

impl Tombstone {
    pub fn now(actor: Uuid) -> Self {
        Self {
            deleted_at: Utc::now(),
            deleted_by: actor,
        }
    }

    /// Rebuild from a nullable column pair; a half-filled pair counts as not deleted.
    pub fn from_columns(at: Option<DateTime<Utc>>, by: Option<Uuid>) -> Option<Self> {
        match (at, by) {
            (Some(deleted_at), Some(deleted_by)) => Some(Self {
                deleted_at,
                deleted_by,
            }),
            _ => None,
        }
    }
}

pub trait SoftDelete {
    const ENTITY: &'static str;

    fn tombstone(&self) -> Option<&Tombstone>;

    fn tombstone_mut(&mut self) -> &mut Option<Tombstone>;

    fn is_deleted(&self) -> bool {
        self.tombstone().is_some()
    }

    fn soft_delete(&mut self, actor: Uuid) -> AppResult<()> {
        if self.is_deleted() {
            return Err(AppError::conflict(format!("{} already deleted", Self::ENTITY)));
        }
        *self.tombstone_mut() = Some(Tombstone::now(actor));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Trainee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Trainee => "trainee",
            Role::Admin => "admin",
        }
    }

    /// Unknown input falls back to `Trainee`. Registration relies on this, so
    /// a typo in the requested role silently produces a trainee account.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(role = %s, "unrecognized role, falling back to trainee");
            Role::Trainee
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trainee" => Ok(Role::Trainee),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::bad_request(format!("unknown role: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            _ => Err(AppError::bad_request(format!("unknown order status: {s}"))),
        }
    }
}

/// One page of a listing plus the unpaged row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
