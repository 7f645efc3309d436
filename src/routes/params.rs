use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entity::{carts, orders, products, users},
    models::OrderStatus,
    response::Meta,
};

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;
// Keeps `offset()` within a Postgres bigint for any limit.
const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT + 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl From<SortOrder> for Order {
    fn from(sort: SortOrder) -> Self {
        match sort {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Normalized paging window plus an allow-listed sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page: u64,
    pub limit: u64,
    pub sort: SortOrder,
    pub field: F,
}

impl<F: Default> PageRequest<F> {
    pub fn new(
        page: Option<u64>,
        limit: Option<u64>,
        sort: Option<SortOrder>,
        field: Option<F>,
    ) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            sort: sort.unwrap_or_default(),
            field: field.unwrap_or_default(),
        }
    }
}

impl<F> PageRequest<F> {
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    pub fn meta(&self, total: u64) -> Meta {
        Meta::new(self.page, self.limit, total)
    }
}

impl<F: Default> Default for PageRequest<F> {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    #[default]
    Id,
    Username,
    Name,
    CreatedAt,
}

impl UserSortField {
    pub fn column(&self) -> users::Column {
        match self {
            UserSortField::Id => users::Column::Id,
            UserSortField::Username => users::Column::Username,
            UserSortField::Name => users::Column::Name,
            UserSortField::CreatedAt => users::Column::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
    #[default]
    Id,
    Name,
    Price,
    Stock,
    CreatedAt,
}

impl ProductSortField {
    pub fn column(&self) -> products::Column {
        match self {
            ProductSortField::Id => products::Column::Id,
            ProductSortField::Name => products::Column::Name,
            ProductSortField::Price => products::Column::Price,
            ProductSortField::Stock => products::Column::Stock,
            ProductSortField::CreatedAt => products::Column::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CartSortField {
    #[default]
    Id,
    UserId,
    CreatedAt,
}

impl CartSortField {
    pub fn column(&self) -> carts::Column {
        match self {
            CartSortField::Id => carts::Column::Id,
            CartSortField::UserId => carts::Column::UserId,
            CartSortField::CreatedAt => carts::Column::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortField {
    #[default]
    Id,
    TotalPrice,
    Status,
    CreatedAt,
}

impl OrderSortField {
    pub fn column(&self) -> orders::Column {
        match self {
            OrderSortField::Id => orders::Column::Id,
            OrderSortField::TotalPrice => orders::Column::TotalPrice,
            OrderSortField::Status => orders::Column::Status,
            OrderSortField::CreatedAt => orders::Column::CreatedAt,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Page number, default 1
    pub page: Option<u64>,
    /// Items per page, default 10, max 100
    pub limit: Option<u64>,
    pub sort: Option<SortOrder>,
    pub field: Option<UserSortField>,
}

impl UserListQuery {
    pub fn page_request(&self) -> PageRequest<UserSortField> {
        PageRequest::new(self.page, self.limit, self.sort, self.field)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<SortOrder>,
    pub field: Option<CartSortField>,
}

impl CartListQuery {
    pub fn page_request(&self) -> PageRequest<CartSortField> {
        PageRequest::new(self.page, self.limit, self.sort, self.field)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<SortOrder>,
    pub field: Option<ProductSortField>,
    /// Case-insensitive substring of the product name
    pub product_title: Option<String>,
}

impl ProductListQuery {
    pub fn page_request(&self) -> PageRequest<ProductSortField> {
        PageRequest::new(self.page, self.limit, self.sort, self.field)
    }

    pub fn title(&self) -> Option<String> {
        self.product_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<SortOrder>,
    pub field: Option<OrderSortField>,
    /// One of `pending`, `paid`, `shipped`
    pub status: Option<OrderStatus>,
    /// `true` for cancelled orders only, `false` for live ones only
    pub cancelled: Option<bool>,
    /// Only honoured for admins
    pub user_id: Option<Uuid>,
}

impl OrderListQuery {
    pub fn page_request(&self) -> PageRequest<OrderSortField> {
        PageRequest::new(self.page, self.limit, self.sort, self.field)
    }
}
