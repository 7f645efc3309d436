use chrono::Utc;
use sea_orm::{DbErr, SqlErr, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Audit, Tombstone},
};

pub mod cart_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use cart_repository::{CartRepository, PgCartRepository};
pub use order_repository::{OrderFilter, OrderRepository, PgOrderRepository};
pub use product_repository::{PgProductRepository, ProductRepository};
pub use user_repository::{PgUserRepository, UserRepository};

#[cfg(test)]
pub use cart_repository::MockCartRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

/// Logs a store failure and converts it. Unique-key violations become
/// `Conflict` naming `entity`; everything else stays a 500.
pub(crate) fn db_error(entity: &'static str) -> impl Fn(DbErr) -> AppError {
    move |err| {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::warn!(entity, %detail, "unique constraint violated");
            return AppError::conflict(format!("{entity} already exists"));
        }
        tracing::error!(entity, error = %err, "database error");
        AppError::OrmError(err)
    }
}

pub(crate) fn audit_from_columns(
    created_at: DateTimeWithTimeZone,
    created_by: Uuid,
    updated_at: DateTimeWithTimeZone,
    updated_by: Uuid,
) -> Audit {
    Audit {
        created_at: created_at.with_timezone(&Utc),
        created_by,
        updated_at: updated_at.with_timezone(&Utc),
        updated_by,
    }
}

pub(crate) fn tombstone_from_columns(
    deleted_at: Option<DateTimeWithTimeZone>,
    deleted_by: Option<Uuid>,
) -> Option<Tombstone> {
    Tombstone::from_columns(deleted_at.map(|at| at.with_timezone(&Utc)), deleted_by)
}

pub(crate) fn tombstone_columns(
    deleted: Option<Tombstone>,
) -> (Option<DateTimeWithTimeZone>, Option<Uuid>) {
    match deleted {
        Some(t) => (Some(t.deleted_at.into()), Some(t.deleted_by)),
        None => (None, None),
    }
}
