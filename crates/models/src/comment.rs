use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, transaction, user};

/// Remark left on a transaction; removed together with it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Transaction, User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Transaction => Entity::belongs_to(transaction::Entity)
                .from(Column::TransactionId)
                .to(transaction::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, transaction_id: Uuid, user_id: Uuid, body: &str) -> Result<Model, errors::ModelError> {
    if body.trim().is_empty() {
        return Err(errors::ModelError::Validation("Please enter a comment".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        transaction_id: Set(transaction_id),
        user_id: Set(user_id),
        body: Set(body.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
