use chrono::{DateTime, FixedOffset};
use models::delivery::{self, NewDelivery};
use models::enums::Status;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::ids::parse_id;
use crate::populate::ProductRef;

/// Delivery with its `product` populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryView {
    pub id: Uuid,
    pub product: Option<ProductRef>,
    pub company_name: String,
    pub date: DateTime<FixedOffset>,
    pub price: f64,
    pub status: Status,
    pub quantity: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl DeliveryView {
    pub fn from_model(m: delivery::Model, product: Option<ProductRef>) -> Self {
        Self {
            id: m.id,
            product,
            company_name: m.company_name,
            date: m.date,
            price: m.price,
            status: m.status,
            quantity: m.quantity,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for create and update; `product` is the referenced product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryInput {
    pub product: Option<String>,
    pub company_name: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub price: Option<f64>,
    pub status: Option<Status>,
    pub quantity: Option<i32>,
}

/// Validated partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryChanges {
    pub product_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub price: Option<f64>,
    pub status: Option<Status>,
    pub quantity: Option<i32>,
}

fn validate_quantity(quantity: i32) -> Result<(), ServiceError> {
    if quantity < 0 {
        return Err(ServiceError::Validation("Quantity cannot be negative".into()));
    }
    Ok(())
}

impl DeliveryInput {
    pub fn into_new(self) -> Result<NewDelivery, ServiceError> {
        let product_id = match self.product.as_deref() {
            Some(raw) => parse_id(raw, "product")?,
            None => return Err(ServiceError::Validation("Please enter a product".into())),
        };
        let company_name = self.company_name.unwrap_or_default().trim().to_string();
        delivery::validate_company_name(&company_name)?;
        let date = self
            .date
            .ok_or_else(|| ServiceError::Validation("Please enter a date of your delivery".into()))?;
        let price = self.price.ok_or_else(|| ServiceError::Validation("Please enter a price".into()))?;
        delivery::validate_price(price)?;
        let quantity = self.quantity.ok_or_else(|| ServiceError::Validation("Please enter a quantity".into()))?;
        validate_quantity(quantity)?;
        Ok(NewDelivery {
            product_id,
            company_name,
            date,
            price,
            status: self.status.unwrap_or_default(),
            quantity,
        })
    }

    /// Re-run field validation on whatever the caller supplied.
    pub fn into_changes(self) -> Result<DeliveryChanges, ServiceError> {
        let product_id = self.product.as_deref().map(|raw| parse_id(raw, "product")).transpose()?;
        let company_name = match self.company_name {
            Some(name) => {
                let name = name.trim().to_string();
                delivery::validate_company_name(&name)?;
                Some(name)
            }
            None => None,
        };
        if let Some(price) = self.price {
            delivery::validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(DeliveryChanges {
            product_id,
            company_name,
            date: self.date,
            price: self.price,
            status: self.status,
            quantity: self.quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> DeliveryInput {
        DeliveryInput {
            product: Some(Uuid::new_v4().to_string()),
            company_name: Some("  Acme Freight ".into()),
            date: Some(DateTime::parse_from_rfc3339("2024-05-01T08:00:00+00:00").unwrap()),
            price: Some(120.5),
            status: None,
            quantity: Some(4),
        }
    }

    #[test]
    fn into_new_trims_and_defaults_status() {
        let new = input().into_new().unwrap();
        assert_eq!(new.company_name, "Acme Freight");
        assert_eq!(new.status, Status::Pending);
    }

    #[test]
    fn into_new_reports_first_missing_field() {
        let err = DeliveryInput { product: None, ..input() }.into_new().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a product");
        let err = DeliveryInput { quantity: None, ..input() }.into_new().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a quantity");
    }

    #[test]
    fn into_new_rejects_bad_product_id() {
        let err = DeliveryInput { product: Some("abc".into()), ..input() }.into_new().unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId(_)));
    }

    #[test]
    fn into_changes_revalidates_supplied_fields() {
        let err = DeliveryInput { company_name: Some("x".repeat(31)), ..Default::default() }
            .into_changes()
            .unwrap_err();
        assert_eq!(err.to_string(), "The delivery name cannot exceed 30 characters");

        let changes = DeliveryInput { status: Some(Status::Completed), ..Default::default() }
            .into_changes()
            .unwrap();
        assert_eq!(changes, DeliveryChanges { status: Some(Status::Completed), ..Default::default() });
    }
}
