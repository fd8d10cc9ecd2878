use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{ProductInput, ProductView};
use super::repository::ProductRepository;
use crate::errors::ServiceError;
use crate::ids::parse_id;

const RESOURCE: &str = "product";

pub struct ProductService<R: ProductRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ProductRepository + ?Sized> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductView>, ServiceError> {
        let rows = self.repo.list().await?;
        common::metrics::record_crud(RESOURCE, "list");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ProductView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let row = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Product", id))?;
        common::metrics::record_crud(RESOURCE, "get");
        Ok(row)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> Result<ProductView, ServiceError> {
        let new = input.into_new()?;
        if !self.repo.user_exists(new.user_id).await? {
            return Err(ServiceError::not_found("User", new.user_id));
        }
        let created = self.repo.insert(new).await?;
        common::metrics::record_crud(RESOURCE, "create");
        info!(product_id = %created.id, product_name = %created.product_name, "product created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: ProductInput) -> Result<ProductView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let changes = input.into_changes()?;
        if let Some(user_id) = changes.user_id {
            if !self.repo.user_exists(user_id).await? {
                return Err(ServiceError::not_found("User", user_id));
            }
        }
        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;
        common::metrics::record_crud(RESOURCE, "update");
        info!(product_id = %id, "product updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<ProductView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let existing = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Product", id))?;
        self.repo.delete(id).await?;
        common::metrics::record_crud(RESOURCE, "delete");
        info!(product_id = %id, "product deleted");
        Ok(existing)
    }
}
