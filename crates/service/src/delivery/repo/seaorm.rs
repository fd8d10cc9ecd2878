use chrono::Utc;
use models::delivery::{self, NewDelivery};
use models::product;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::delivery::domain::{DeliveryChanges, DeliveryView};
use crate::delivery::repository::DeliveryRepository;
use crate::errors::ServiceError;
use crate::populate;

pub struct SeaOrmDeliveryRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmDeliveryRepository {
    async fn populate(&self, rows: Vec<delivery::Model>) -> Result<Vec<DeliveryView>, ServiceError> {
        let refs = populate::product_refs(&self.db, rows.iter().map(|d| d.product_id)).await?;
        Ok(rows
            .into_iter()
            .map(|d| {
                let product = refs.get(&d.product_id).cloned();
                DeliveryView::from_model(d, product)
            })
            .collect())
    }

    async fn populate_one(&self, row: delivery::Model) -> Result<DeliveryView, ServiceError> {
        let product = populate::product_refs(&self.db, [row.product_id]).await?.remove(&row.product_id);
        Ok(DeliveryView::from_model(row, product))
    }
}

#[async_trait::async_trait]
impl DeliveryRepository for SeaOrmDeliveryRepository {
    async fn list(&self) -> Result<Vec<DeliveryView>, ServiceError> {
        let rows = delivery::Entity::find()
            .order_by_desc(delivery::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.populate(rows).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<DeliveryView>, ServiceError> {
        match delivery::Entity::find_by_id(id).one(&self.db).await? {
            Some(row) => Ok(Some(self.populate_one(row).await?)),
            None => Ok(None),
        }
    }

    async fn company_name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut query = delivery::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(delivery::Column::CompanyName))).eq(name.trim().to_lowercase()));
        if let Some(id) = exclude {
            query = query.filter(delivery::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    async fn insert(&self, input: NewDelivery) -> Result<DeliveryView, ServiceError> {
        let row = delivery::create(&self.db, input).await?;
        self.populate_one(row).await
    }

    async fn update(&self, id: Uuid, changes: DeliveryChanges) -> Result<Option<DeliveryView>, ServiceError> {
        let Some(row) = delivery::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am = row.into_active_model();
        if let Some(v) = changes.product_id { am.product_id = Set(v); }
        if let Some(v) = changes.company_name { am.company_name = Set(v); }
        if let Some(v) = changes.date { am.date = Set(v); }
        if let Some(v) = changes.price { am.price = Set(v); }
        if let Some(v) = changes.status { am.status = Set(v); }
        if let Some(v) = changes.quantity { am.quantity = Set(v); }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await?;
        Ok(Some(self.populate_one(updated).await?))
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<u64, ServiceError> {
        let (deleted, products) = tokio::join!(
            delivery::Entity::delete_by_id(id).exec(&self.db),
            product::Entity::delete_many()
                .filter(product::Column::ScheduleId.eq(id))
                .exec(&self.db),
        );
        deleted?;
        Ok(products?.rows_affected)
    }
}
