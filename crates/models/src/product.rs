use sea_orm::{entity::prelude::*, FromJsonQueryResult, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::enums::Variant;
use crate::{errors, user};

pub const PRODUCT_NAME_MAX: usize = 30;

/// One uploaded picture of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub public_id: String,
    pub url: String,
    pub originalname: String,
}

/// JSONB column holding every image of a product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ProductImages(pub Vec<ProductImage>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_name: String,
    #[sea_orm(column_name = "type")]
    pub product_type: String,
    pub class: String,
    pub variant: Variant,
    #[sea_orm(column_type = "JsonBinary")]
    pub image: ProductImages,
    /// Delivery this product is scheduled on, if any.
    pub schedule_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields required to insert a product; validated by [`validate`](NewProduct::validate).
#[derive(Clone, Debug)]
pub struct NewProduct {
    pub user_id: Uuid,
    pub product_name: String,
    pub product_type: String,
    pub class: String,
    pub variant: Variant,
    pub image: Vec<ProductImage>,
    pub schedule_id: Option<Uuid>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_product_name(&self.product_name)?;
        if self.product_type.trim().is_empty() {
            return Err(errors::ModelError::Validation("Please enter a type of your product".into()));
        }
        if self.class.trim().is_empty() {
            return Err(errors::ModelError::Validation("Please enter a class of your product".into()));
        }
        validate_images(&self.image)
    }
}

pub fn validate_product_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("Please enter a product name".into()));
    }
    if name.chars().count() > PRODUCT_NAME_MAX {
        return Err(errors::ModelError::Validation("The product name cannot exceed 30 characters".into()));
    }
    Ok(())
}

pub fn validate_images(images: &[ProductImage]) -> Result<(), errors::ModelError> {
    for img in images {
        if img.public_id.trim().is_empty() || img.url.trim().is_empty() || img.originalname.trim().is_empty() {
            return Err(errors::ModelError::Validation(
                "Every image needs public_id, url and originalname".into(),
            ));
        }
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewProduct) -> Result<Model, errors::ModelError> {
    input.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id),
        product_name: Set(input.product_name),
        product_type: Set(input.product_type),
        class: Set(input.class),
        variant: Set(input.variant),
        image: Set(ProductImages(input.image)),
        schedule_id: Set(input.schedule_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
