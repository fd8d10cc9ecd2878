use chrono::Utc;
use models::product::{self, NewProduct, ProductImages};
use models::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::populate;
use crate::product::domain::{ProductChanges, ProductView};
use crate::product::repository::ProductRepository;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    async fn populate(&self, rows: Vec<product::Model>) -> Result<Vec<ProductView>, ServiceError> {
        let users = populate::user_refs(&self.db, rows.iter().map(|p| p.user_id)).await?;
        Ok(rows
            .into_iter()
            .map(|p| {
                let user = users.get(&p.user_id).cloned();
                ProductView::from_model(p, user)
            })
            .collect())
    }

    async fn populate_one(&self, row: product::Model) -> Result<ProductView, ServiceError> {
        let user = populate::user_refs(&self.db, [row.user_id]).await?.remove(&row.user_id);
        Ok(ProductView::from_model(row, user))
    }
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self) -> Result<Vec<ProductView>, ServiceError> {
        let rows = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.populate(rows).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<ProductView>, ServiceError> {
        match product::Entity::find_by_id(id).one(&self.db).await? {
            Some(row) => Ok(Some(self.populate_one(row).await?)),
            None => Ok(None),
        }
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        Ok(user::Entity::find_by_id(user_id).count(&self.db).await? > 0)
    }

    async fn insert(&self, input: NewProduct) -> Result<ProductView, ServiceError> {
        let row = product::create(&self.db, input).await?;
        self.populate_one(row).await
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<ProductView>, ServiceError> {
        let Some(row) = product::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am = row.into_active_model();
        if let Some(v) = changes.user_id { am.user_id = Set(v); }
        if let Some(v) = changes.product_name { am.product_name = Set(v); }
        if let Some(v) = changes.product_type { am.product_type = Set(v); }
        if let Some(v) = changes.class { am.class = Set(v); }
        if let Some(v) = changes.variant { am.variant = Set(v); }
        if let Some(v) = changes.image { am.image = Set(ProductImages(v)); }
        if let Some(v) = changes.schedule_id { am.schedule_id = Set(Some(v)); }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await?;
        Ok(Some(self.populate_one(updated).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = product::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
