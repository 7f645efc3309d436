use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    dto::products::CreateProductRequest,
    error::AppResult,
    models::{Page, Product},
    repositories::ProductRepository,
    routes::params::{PageRequest, ProductSortField},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create(&self, payload: CreateProductRequest, actor_id: Uuid) -> AppResult<Product>;

    async fn get_all(
        &self,
        page: PageRequest<ProductSortField>,
        title: Option<String>,
    ) -> AppResult<Page<Product>>;

    async fn get_by_id(&self, product_id: Uuid) -> AppResult<Product>;

    async fn exists_by_id(&self, product_id: Uuid) -> AppResult<bool>;
}

pub struct ProductServiceImpl {
    repository: Arc<dyn ProductRepository>,
}

impl ProductServiceImpl {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    #[tracing::instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create(&self, payload: CreateProductRequest, actor_id: Uuid) -> AppResult<Product> {
        let product = Product::new_from_payload(payload, actor_id);
        self.repository.create(product).await
    }

    async fn get_all(
        &self,
        page: PageRequest<ProductSortField>,
        title: Option<String>,
    ) -> AppResult<Page<Product>> {
        self.repository.get_all(page, title).await
    }

    async fn get_by_id(&self, product_id: Uuid) -> AppResult<Product> {
        self.repository.get_by_id(product_id).await
    }

    async fn exists_by_id(&self, product_id: Uuid) -> AppResult<bool> {
        self.repository.exists_by_id(product_id).await
    }
}
