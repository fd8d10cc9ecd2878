use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::enums::Status;
use crate::{errors, product};

pub const COMPANY_NAME_MAX: usize = 30;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub company_name: String,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub status: Status,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Product }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug)]
pub struct NewDelivery {
    pub product_id: Uuid,
    pub company_name: String,
    pub date: DateTimeWithTimeZone,
    pub price: f64,
    pub status: Status,
    pub quantity: i32,
}

pub fn validate_company_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("Please enter a delivery name".into()));
    }
    if name.chars().count() > COMPANY_NAME_MAX {
        return Err(errors::ModelError::Validation("The delivery name cannot exceed 30 characters".into()));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() {
        return Err(errors::ModelError::Validation("Please enter a price".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewDelivery) -> Result<Model, errors::ModelError> {
    validate_company_name(&input.company_name)?;
    validate_price(input.price)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(input.product_id),
        company_name: Set(input.company_name),
        date: Set(input.date),
        price: Set(input.price),
        status: Set(input.status),
        quantity: Set(input.quantity),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_name_length_is_bounded() {
        assert!(validate_company_name("Acme Freight").is_ok());
        assert!(validate_company_name(&"c".repeat(30)).is_ok());
        assert!(validate_company_name(&"c".repeat(31)).is_err());
        assert!(validate_company_name("").is_err());
    }

    #[test]
    fn price_must_be_finite() {
        assert!(validate_price(12.5).is_ok());
        assert!(validate_price(f64::NAN).is_err());
    }
}
