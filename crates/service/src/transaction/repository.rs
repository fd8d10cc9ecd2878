use async_trait::async_trait;
use models::transaction::NewTransaction;
use uuid::Uuid;

use super::domain::{TransactionChanges, TransactionView};
use crate::errors::ServiceError;
use crate::populate::UserContact;

/// Persistence for transactions. Reads return rows with `user` and `product` populated.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<TransactionView>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<TransactionView>, ServiceError>;
    async fn user_contact(&self, user_id: Uuid) -> Result<Option<UserContact>, ServiceError>;
    async fn insert(&self, input: NewTransaction) -> Result<TransactionView, ServiceError>;
    async fn update(&self, id: Uuid, changes: TransactionChanges) -> Result<Option<TransactionView>, ServiceError>;
    /// Delete the transaction and its comments. Returns the number of comments removed.
    async fn delete_cascade(&self, id: Uuid) -> Result<u64, ServiceError>;
}

/// In-memory repository for tests.
pub mod mock {
    use super::*;
    use crate::populate::{ordered_cards, ProductCard, UserRef};
    use chrono::{DateTime, FixedOffset, Utc};
    use models::enums::Status;
    use models::product::{ProductImage, ProductImages};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct Row {
        id: Uuid,
        user_id: Uuid,
        product_ids: Vec<Uuid>,
        status: Status,
        date: DateTime<FixedOffset>,
        created_at: DateTime<FixedOffset>,
        updated_at: DateTime<FixedOffset>,
    }

    #[derive(Default)]
    pub struct MockTransactionRepository {
        rows: Mutex<Vec<Row>>,
        users: Mutex<HashMap<Uuid, UserContact>>,
        products: Mutex<HashMap<Uuid, ProductCard>>,
        // comment id -> transaction id
        comments: Mutex<HashMap<Uuid, Uuid>>,
    }

    impl MockTransactionRepository {
        pub fn add_user(&self, name: &str, email: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.users
                .lock()
                .unwrap()
                .insert(id, UserContact { id, name: name.to_string(), email: email.to_string() });
            id
        }

        pub fn add_product(&self, name: &str) -> Uuid {
            let id = Uuid::new_v4();
            let image = ProductImages(vec![ProductImage {
                public_id: format!("img-{}", id),
                url: format!("https://cdn.example.com/{}.png", id),
                originalname: format!("{}.png", name),
            }]);
            self.products
                .lock()
                .unwrap()
                .insert(id, ProductCard { id, product_name: name.to_string(), image });
            id
        }

        pub fn add_comment(&self, transaction_id: Uuid) {
            self.comments.lock().unwrap().insert(Uuid::new_v4(), transaction_id);
        }

        pub fn comment_count(&self) -> usize {
            self.comments.lock().unwrap().len()
        }

        fn view(&self, row: &Row) -> TransactionView {
            let user = self
                .users
                .lock()
                .unwrap()
                .get(&row.user_id)
                .map(|u| UserRef { id: u.id, name: u.name.clone() });
            let product = ordered_cards(&row.product_ids, &self.products.lock().unwrap());
            TransactionView {
                id: row.id,
                user,
                product,
                status: row.status,
                date: row.date,
                created_at: row.created_at,
                updated_at: row.updated_at,
            }
        }
    }

    #[async_trait]
    impl TransactionRepository for MockTransactionRepository {
        async fn list(&self) -> Result<Vec<TransactionView>, ServiceError> {
            let rows = self.rows.lock().unwrap().clone();
            Ok(rows.iter().rev().map(|r| self.view(r)).collect())
        }

        async fn get(&self, id: Uuid) -> Result<Option<TransactionView>, ServiceError> {
            let row = self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned();
            Ok(row.map(|r| self.view(&r)))
        }

        async fn user_contact(&self, user_id: Uuid) -> Result<Option<UserContact>, ServiceError> {
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }

        async fn insert(&self, input: NewTransaction) -> Result<TransactionView, ServiceError> {
            let now = Utc::now().fixed_offset();
            let row = Row {
                id: Uuid::new_v4(),
                user_id: input.user_id,
                product_ids: input.product_ids,
                status: Status::Pending,
                date: input.date,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(self.view(&row))
        }

        async fn update(&self, id: Uuid, changes: TransactionChanges) -> Result<Option<TransactionView>, ServiceError> {
            let updated = {
                let mut rows = self.rows.lock().unwrap();
                let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
                    return Ok(None);
                };
                if let Some(v) = changes.user_id { row.user_id = v; }
                if let Some(v) = changes.product_ids { row.product_ids = v; }
                if let Some(v) = changes.status { row.status = v; }
                if let Some(v) = changes.date { row.date = v; }
                row.updated_at = Utc::now().fixed_offset();
                row.clone()
            };
            Ok(Some(self.view(&updated)))
        }

        async fn delete_cascade(&self, id: Uuid) -> Result<u64, ServiceError> {
            self.rows.lock().unwrap().retain(|r| r.id != id);
            let mut comments = self.comments.lock().unwrap();
            let before = comments.len();
            comments.retain(|_, tx| *tx != id);
            Ok((before - comments.len()) as u64)
        }
    }
}
