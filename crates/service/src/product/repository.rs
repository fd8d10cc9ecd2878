use async_trait::async_trait;
use models::product::NewProduct;
use uuid::Uuid;

use super::domain::{ProductChanges, ProductView};
use crate::errors::ServiceError;

/// Persistence for products. Reads return rows with `user` populated.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<ProductView>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<ProductView>, ServiceError>;
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, ServiceError>;
    async fn insert(&self, input: NewProduct) -> Result<ProductView, ServiceError>;
    async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<ProductView>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests.
pub mod mock {
    use super::*;
    use crate::populate::UserRef;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockProductRepository {
        rows: Mutex<Vec<ProductView>>,
        users: Mutex<HashMap<Uuid, UserRef>>,
    }

    impl MockProductRepository {
        pub fn add_user(&self, name: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.users.lock().unwrap().insert(id, UserRef { id, name: name.to_string() });
            id
        }

        fn user_ref(&self, id: Uuid) -> Option<UserRef> {
            self.users.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn list(&self) -> Result<Vec<ProductView>, ServiceError> {
            Ok(self.rows.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn get(&self, id: Uuid) -> Result<Option<ProductView>, ServiceError> {
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn user_exists(&self, user_id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.users.lock().unwrap().contains_key(&user_id))
        }

        async fn insert(&self, input: NewProduct) -> Result<ProductView, ServiceError> {
            let now = Utc::now().fixed_offset();
            let view = ProductView {
                id: Uuid::new_v4(),
                user: self.user_ref(input.user_id),
                product_name: input.product_name,
                product_type: input.product_type,
                class: input.class,
                variant: input.variant,
                image: input.image,
                schedule: input.schedule_id,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(view.clone());
            Ok(view)
        }

        async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<ProductView>, ServiceError> {
            let user = changes.user_id.map(|uid| self.user_ref(uid));
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
                return Ok(None);
            };
            if let Some(user) = user { row.user = user; }
            if let Some(v) = changes.product_name { row.product_name = v; }
            if let Some(v) = changes.product_type { row.product_type = v; }
            if let Some(v) = changes.class { row.class = v; }
            if let Some(v) = changes.variant { row.variant = v; }
            if let Some(v) = changes.image { row.image = v; }
            if let Some(v) = changes.schedule_id { row.schedule = Some(v); }
            row.updated_at = Utc::now().fixed_offset();
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|p| p.id != id);
            Ok(rows.len() != before)
        }
    }
}
