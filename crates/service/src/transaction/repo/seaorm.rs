use chrono::Utc;
use models::transaction::{self, NewTransaction};
use models::comment;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::populate::{self, UserContact};
use crate::transaction::domain::{TransactionChanges, TransactionView};
use crate::transaction::repository::TransactionRepository;

pub struct SeaOrmTransactionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmTransactionRepository {
    async fn populate(&self, rows: Vec<transaction::Model>) -> Result<Vec<TransactionView>, ServiceError> {
        let users = populate::user_refs(&self.db, rows.iter().map(|t| t.user_id)).await?;
        let cards = populate::product_cards(&self.db, rows.iter().flat_map(|t| t.product_ids.iter().copied())).await?;
        Ok(rows
            .into_iter()
            .map(|t| {
                let user = users.get(&t.user_id).cloned();
                let product = populate::ordered_cards(&t.product_ids, &cards);
                TransactionView::from_model(t, user, product)
            })
            .collect())
    }

    async fn populate_one(&self, row: transaction::Model) -> Result<TransactionView, ServiceError> {
        self.populate(vec![row])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::Db("populated row missing".into()))
    }
}

#[async_trait::async_trait]
impl TransactionRepository for SeaOrmTransactionRepository {
    async fn list(&self) -> Result<Vec<TransactionView>, ServiceError> {
        let rows = transaction::Entity::find()
            .order_by_desc(transaction::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.populate(rows).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<TransactionView>, ServiceError> {
        match transaction::Entity::find_by_id(id).one(&self.db).await? {
            Some(row) => Ok(Some(self.populate_one(row).await?)),
            None => Ok(None),
        }
    }

    async fn user_contact(&self, user_id: Uuid) -> Result<Option<UserContact>, ServiceError> {
        populate::user_contact(&self.db, user_id).await
    }

    async fn insert(&self, input: NewTransaction) -> Result<TransactionView, ServiceError> {
        let row = transaction::create(&self.db, input).await?;
        self.populate_one(row).await
    }

    async fn update(&self, id: Uuid, changes: TransactionChanges) -> Result<Option<TransactionView>, ServiceError> {
        let Some(row) = transaction::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am = row.into_active_model();
        if let Some(v) = changes.user_id { am.user_id = Set(v); }
        if let Some(v) = changes.product_ids { am.product_ids = Set(v); }
        if let Some(v) = changes.status { am.status = Set(v); }
        if let Some(v) = changes.date { am.date = Set(v); }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await?;
        Ok(Some(self.populate_one(updated).await?))
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<u64, ServiceError> {
        let (deleted, comments) = tokio::join!(
            transaction::Entity::delete_by_id(id).exec(&self.db),
            comment::Entity::delete_many()
                .filter(comment::Column::TransactionId.eq(id))
                .exec(&self.db),
        );
        deleted?;
        Ok(comments?.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_user};
    use models::enums::{Status, Variant};
    use models::product::{self, NewProduct, ProductImage};

    #[tokio::test]
    async fn transaction_populates_and_drops_comments() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let repo = SeaOrmTransactionRepository { db: db.clone() };
        let uid = seed_user(&db, "Buyer").await?;
        let p = product::create(&db, NewProduct {
            user_id: uid,
            product_name: "Beans".into(),
            product_type: "Legume".into(),
            class: "B".into(),
            variant: Variant::International,
            image: vec![ProductImage { public_id: "b1".into(), url: "https://cdn.example.com/b1.png".into(), originalname: "b1.png".into() }],
            schedule_id: None,
        })
        .await?;

        let tx = repo
            .insert(NewTransaction { user_id: uid, product_ids: vec![p.id], date: Utc::now().into() })
            .await?;
        assert_eq!(tx.status, Status::Pending);
        assert_eq!(tx.user.as_ref().map(|u| u.name.as_str()), Some("Buyer"));
        assert_eq!(tx.product.len(), 1);
        assert_eq!(tx.product[0].image.0[0].originalname, "b1.png");

        comment::create(&db, tx.id, uid, "leave at the door").await?;
        comment::create(&db, tx.id, uid, "ring twice").await?;
        assert_eq!(repo.delete_cascade(tx.id).await?, 2);
        assert!(repo.get(tx.id).await?.is_none());
        Ok(())
    }
}
