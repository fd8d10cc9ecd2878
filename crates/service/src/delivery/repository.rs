use async_trait::async_trait;
use models::delivery::NewDelivery;
use uuid::Uuid;

use super::domain::{DeliveryChanges, DeliveryView};
use crate::errors::ServiceError;

/// Persistence for deliveries. Reads return rows with `product` populated.
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<DeliveryView>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<DeliveryView>, ServiceError>;
    /// Case-insensitive match on `company_name`, ignoring `exclude`.
    async fn company_name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError>;
    async fn insert(&self, input: NewDelivery) -> Result<DeliveryView, ServiceError>;
    async fn update(&self, id: Uuid, changes: DeliveryChanges) -> Result<Option<DeliveryView>, ServiceError>;
    /// Delete the delivery and every product scheduled on it. Returns the number of products removed.
    async fn delete_cascade(&self, id: Uuid) -> Result<u64, ServiceError>;
}

/// In-memory repository for tests.
pub mod mock {
    use super::*;
    use crate::populate::ProductRef;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockDeliveryRepository {
        deliveries: Mutex<Vec<DeliveryView>>,
        products: Mutex<HashMap<Uuid, ProductRef>>,
        // product id -> delivery it is scheduled on
        schedules: Mutex<HashMap<Uuid, Uuid>>,
    }

    impl MockDeliveryRepository {
        /// Register a product that deliveries may reference.
        pub fn add_product(&self, name: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.products.lock().unwrap().insert(id, ProductRef { id, product_name: name.to_string() });
            id
        }

        pub fn schedule_product(&self, product_id: Uuid, delivery_id: Uuid) {
            self.schedules.lock().unwrap().insert(product_id, delivery_id);
        }

        pub fn product_count(&self) -> usize {
            self.products.lock().unwrap().len()
        }

        fn product_ref(&self, id: Uuid) -> Option<ProductRef> {
            self.products.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl DeliveryRepository for MockDeliveryRepository {
        async fn list(&self) -> Result<Vec<DeliveryView>, ServiceError> {
            Ok(self.deliveries.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn get(&self, id: Uuid) -> Result<Option<DeliveryView>, ServiceError> {
            Ok(self.deliveries.lock().unwrap().iter().find(|d| d.id == id).cloned())
        }

        async fn company_name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
            let needle = name.trim().to_lowercase();
            Ok(self
                .deliveries
                .lock()
                .unwrap()
                .iter()
                .any(|d| Some(d.id) != exclude && d.company_name.to_lowercase() == needle))
        }

        async fn insert(&self, input: NewDelivery) -> Result<DeliveryView, ServiceError> {
            let now = Utc::now().fixed_offset();
            let view = DeliveryView {
                id: Uuid::new_v4(),
                product: self.product_ref(input.product_id),
                company_name: input.company_name,
                date: input.date,
                price: input.price,
                status: input.status,
                quantity: input.quantity,
                created_at: now,
                updated_at: now,
            };
            self.deliveries.lock().unwrap().push(view.clone());
            Ok(view)
        }

        async fn update(&self, id: Uuid, changes: DeliveryChanges) -> Result<Option<DeliveryView>, ServiceError> {
            let product = changes.product_id.map(|pid| self.product_ref(pid));
            let mut rows = self.deliveries.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|d| d.id == id) else {
                return Ok(None);
            };
            if let Some(product) = product {
                row.product = product;
            }
            if let Some(v) = changes.company_name { row.company_name = v; }
            if let Some(v) = changes.date { row.date = v; }
            if let Some(v) = changes.price { row.price = v; }
            if let Some(v) = changes.status { row.status = v; }
            if let Some(v) = changes.quantity { row.quantity = v; }
            row.updated_at = Utc::now().fixed_offset();
            Ok(Some(row.clone()))
        }

        async fn delete_cascade(&self, id: Uuid) -> Result<u64, ServiceError> {
            self.deliveries.lock().unwrap().retain(|d| d.id != id);
            let mut schedules = self.schedules.lock().unwrap();
            let doomed: Vec<Uuid> = schedules.iter().filter(|(_, d)| **d == id).map(|(p, _)| *p).collect();
            let mut products = self.products.lock().unwrap();
            for pid in &doomed {
                schedules.remove(pid);
                products.remove(pid);
            }
            Ok(doomed.len() as u64)
        }
    }
}
