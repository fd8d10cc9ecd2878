use chrono::{DateTime, FixedOffset};
use models::enums::Status;
use models::transaction::{self, NewTransaction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::ids::parse_id;
use crate::populate::{ProductCard, UserRef};

/// Transaction with `user` and every `product` populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: Uuid,
    pub user: Option<UserRef>,
    pub product: Vec<ProductCard>,
    pub status: Status,
    pub date: DateTime<FixedOffset>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl TransactionView {
    pub fn from_model(m: transaction::Model, user: Option<UserRef>, product: Vec<ProductCard>) -> Self {
        Self {
            id: m.id,
            user,
            product,
            status: m.status,
            date: m.date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    pub fn user_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("unknown user")
    }
}

/// Request body for create and update; `user` and `product` carry ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    pub user: Option<String>,
    pub product: Option<Vec<String>>,
    pub status: Option<Status>,
    pub date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub user_id: Option<Uuid>,
    pub product_ids: Option<Vec<Uuid>>,
    pub status: Option<Status>,
    pub date: Option<DateTime<FixedOffset>>,
}

fn parse_products(raw: Vec<String>) -> Result<Vec<Uuid>, ServiceError> {
    raw.iter().map(|p| parse_id(p, "product")).collect()
}

impl TransactionInput {
    pub fn into_new(self) -> Result<NewTransaction, ServiceError> {
        let user_id = match self.user.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_id(raw, "user")?,
            _ => return Err(ServiceError::Validation("User is required".into())),
        };
        let date = self.date.ok_or_else(|| ServiceError::Validation("Please enter a date".into()))?;
        let product_ids = parse_products(self.product.unwrap_or_default())?;
        Ok(NewTransaction { user_id, product_ids, date })
    }

    pub fn into_changes(self) -> Result<TransactionChanges, ServiceError> {
        let user_id = self.user.as_deref().map(|raw| parse_id(raw, "user")).transpose()?;
        let product_ids = self.product.map(parse_products).transpose()?;
        Ok(TransactionChanges { user_id, product_ids, status: self.status, date: self.date })
    }
}
