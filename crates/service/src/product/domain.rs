use chrono::{DateTime, FixedOffset};
use models::enums::Variant;
use models::product::{self, NewProduct, ProductImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::ids::parse_id;
use crate::populate::UserRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: Uuid,
    pub user: Option<UserRef>,
    pub product_name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub class: String,
    pub variant: Variant,
    pub image: Vec<ProductImage>,
    pub schedule: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ProductView {
    pub fn from_model(m: product::Model, user: Option<UserRef>) -> Self {
        Self {
            id: m.id,
            user,
            product_name: m.product_name,
            product_type: m.product_type,
            class: m.class,
            variant: m.variant,
            image: m.image.0,
            schedule: m.schedule_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub user: Option<String>,
    pub product_name: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub class: Option<String>,
    pub variant: Option<Variant>,
    pub image: Option<Vec<ProductImage>>,
    /// Delivery id the product is scheduled on.
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub user_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub class: Option<String>,
    pub variant: Option<Variant>,
    pub image: Option<Vec<ProductImage>>,
    pub schedule_id: Option<Uuid>,
}

fn non_blank(value: Option<String>, message: &str) -> Result<Option<String>, ServiceError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(ServiceError::Validation(message.into())),
        other => Ok(other),
    }
}

impl ProductInput {
    pub fn into_new(self) -> Result<NewProduct, ServiceError> {
        let user_id = match self.user.as_deref() {
            Some(raw) => parse_id(raw, "user")?,
            None => return Err(ServiceError::Validation("Please enter a user".into())),
        };
        let new = NewProduct {
            user_id,
            product_name: self.product_name.unwrap_or_default().trim().to_string(),
            product_type: self.product_type.unwrap_or_default().trim().to_string(),
            class: self.class.unwrap_or_default().trim().to_string(),
            variant: self.variant.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            schedule_id: self.schedule.as_deref().map(|raw| parse_id(raw, "delivery")).transpose()?,
        };
        new.validate()?;
        Ok(new)
    }

    pub fn into_changes(self) -> Result<ProductChanges, ServiceError> {
        let product_name = match self.product_name {
            Some(name) => {
                let name = name.trim().to_string();
                product::validate_product_name(&name)?;
                Some(name)
            }
            None => None,
        };
        if let Some(images) = &self.image {
            product::validate_images(images)?;
        }
        Ok(ProductChanges {
            user_id: self.user.as_deref().map(|raw| parse_id(raw, "user")).transpose()?,
            product_name,
            product_type: non_blank(self.product_type, "Please enter a type of your product")?,
            class: non_blank(self.class, "Please enter a class of your product")?,
            variant: self.variant,
            image: self.image,
            schedule_id: self.schedule.as_deref().map(|raw| parse_id(raw, "delivery")).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_field_uses_wire_name() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "user": Uuid::new_v4().to_string(),
            "product_name": "Rice",
            "type": "Grain",
            "class": "A",
        }))
        .unwrap();
        let new = input.into_new().unwrap();
        assert_eq!(new.product_type, "Grain");
        assert_eq!(new.variant, Variant::Local);
        assert!(new.image.is_empty());
    }

    #[test]
    fn blank_class_on_update_is_rejected() {
        let err = ProductInput { class: Some("  ".into()), ..Default::default() }.into_changes().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a class of your product");
    }
}
