use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{DeliveryInput, DeliveryView};
use super::repository::DeliveryRepository;
use crate::errors::ServiceError;
use crate::ids::parse_id;

const RESOURCE: &str = "delivery";

pub struct DeliveryService<R: DeliveryRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: DeliveryRepository + ?Sized> DeliveryService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<DeliveryView>, ServiceError> {
        let rows = self.repo.list().await?;
        common::metrics::record_crud(RESOURCE, "list");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<DeliveryView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let row = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Delivery", id))?;
        common::metrics::record_crud(RESOURCE, "get");
        Ok(row)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: DeliveryInput) -> Result<DeliveryView, ServiceError> {
        let new = input.into_new()?;
        if self.repo.company_name_taken(&new.company_name, None).await? {
            return Err(ServiceError::Duplicate("Duplicate company name".into()));
        }
        let created = self.repo.insert(new).await?;
        common::metrics::record_crud(RESOURCE, "create");
        info!(delivery_id = %created.id, company_name = %created.company_name, "delivery created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: DeliveryInput) -> Result<DeliveryView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("Delivery", id));
        }
        let changes = input.into_changes()?;
        if let Some(name) = &changes.company_name {
            if self.repo.company_name_taken(name, Some(id)).await? {
                return Err(ServiceError::Duplicate("Duplicate company name".into()));
            }
        }
        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Delivery", id))?;
        common::metrics::record_crud(RESOURCE, "update");
        info!(delivery_id = %updated.id, "delivery updated");
        Ok(updated)
    }

    /// Removes the delivery plus its scheduled products; returns the delivery as it was.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<DeliveryView, ServiceError> {
        let id = parse_id(id, RESOURCE)?;
        let existing = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Delivery", id))?;
        let products_removed = self.repo.delete_cascade(id).await?;
        common::metrics::record_crud(RESOURCE, "delete");
        info!(delivery_id = %id, products_removed, "delivery deleted");
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::repository::mock::MockDeliveryRepository;
    use chrono::DateTime;
    use models::enums::Status;
    use uuid::Uuid;

    fn input(product: Uuid, name: &str) -> DeliveryInput {
        DeliveryInput {
            product: Some(product.to_string()),
            company_name: Some(name.into()),
            date: Some(DateTime::parse_from_rfc3339("2024-05-01T08:00:00+00:00").unwrap()),
            price: Some(99.0),
            status: None,
            quantity: Some(2),
        }
    }

    fn setup() -> (Arc<MockDeliveryRepository>, DeliveryService<MockDeliveryRepository>) {
        let repo = Arc::new(MockDeliveryRepository::default());
        (repo.clone(), DeliveryService::new(repo))
    }

    #[tokio::test]
    async fn create_populates_product_and_lists_newest_first() {
        let (repo, svc) = setup();
        let pid = repo.add_product("Rice 25kg");
        let first = svc.create(input(pid, "Acme")).await.unwrap();
        let second = svc.create(input(pid, "Globex")).await.unwrap();
        assert_eq!(first.product.as_ref().map(|p| p.product_name.as_str()), Some("Rice 25kg"));
        assert_eq!(first.status, Status::Pending);

        let ids: Vec<Uuid> = svc.list().await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn duplicate_company_name_is_case_insensitive() {
        let (repo, svc) = setup();
        let pid = repo.add_product("Rice");
        svc.create(input(pid, "Acme Freight")).await.unwrap();
        let err = svc.create(input(pid, "ACME freight")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
        assert_eq!(err.to_string(), "Duplicate company name");
    }

    #[tokio::test]
    async fn update_allows_own_name_but_not_another() {
        let (repo, svc) = setup();
        let pid = repo.add_product("Rice");
        let a = svc.create(input(pid, "Acme")).await.unwrap();
        svc.create(input(pid, "Globex")).await.unwrap();

        let same = DeliveryInput { company_name: Some("acme".into()), status: Some(Status::Completed), ..Default::default() };
        let updated = svc.update(&a.id.to_string(), same).await.unwrap();
        assert_eq!(updated.company_name, "acme");
        assert_eq!(updated.status, Status::Completed);

        let clash = DeliveryInput { company_name: Some("GLOBEX".into()), ..Default::default() };
        let err = svc.update(&a.id.to_string(), clash).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }

    #[tokio::test]
    async fn invalid_and_missing_ids() {
        let (_, svc) = setup();
        let err = svc.get("not-a-uuid").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid delivery ID: not-a-uuid");

        let missing = Uuid::new_v4();
        let err = svc.delete(&missing.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_string(), format!("Delivery not found with ID: {}", missing));
    }

    #[tokio::test]
    async fn delete_removes_scheduled_products_and_returns_delivery() {
        let (repo, svc) = setup();
        let pid = repo.add_product("Rice");
        let extra = repo.add_product("Beans");
        let d = svc.create(input(pid, "Acme")).await.unwrap();
        repo.schedule_product(extra, d.id);

        let removed = svc.delete(&d.id.to_string()).await.unwrap();
        assert_eq!(removed.id, d.id);
        assert_eq!(repo.product_count(), 1);
        assert!(svc.get(&d.id.to_string()).await.is_err());
    }
}
