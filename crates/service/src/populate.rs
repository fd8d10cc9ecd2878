//! Resolution of reference columns into the small projections embedded in
//! API payloads. Each loader issues one `IN (...)` query for a batch of rows.

use std::collections::{HashMap, HashSet};

use models::product::ProductImages;
use models::{product, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// `user` populated with `name` only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

/// Notification target of a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct UserContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// `product` populated with `product_name` only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct ProductRef {
    pub id: Uuid,
    pub product_name: String,
}

/// `product` populated with `product_name` and `image`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct ProductCard {
    pub id: Uuid,
    pub product_name: String,
    pub image: ProductImages,
}

fn distinct(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub async fn user_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserRef>, ServiceError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = user::Entity::find()
        .select_only()
        .column(user::Column::Id)
        .column(user::Column::Name)
        .filter(user::Column::Id.is_in(ids))
        .into_model::<UserRef>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.id, r)).collect())
}

pub async fn user_contact(db: &DatabaseConnection, id: Uuid) -> Result<Option<UserContact>, ServiceError> {
    let row = user::Entity::find_by_id(id)
        .select_only()
        .column(user::Column::Id)
        .column(user::Column::Name)
        .column(user::Column::Email)
        .into_model::<UserContact>()
        .one(db)
        .await?;
    Ok(row)
}

pub async fn product_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, ProductRef>, ServiceError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = product::Entity::find()
        .select_only()
        .column(product::Column::Id)
        .column(product::Column::ProductName)
        .filter(product::Column::Id.is_in(ids))
        .into_model::<ProductRef>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.id, r)).collect())
}

pub async fn product_cards(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, ProductCard>, ServiceError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = product::Entity::find()
        .select_only()
        .column(product::Column::Id)
        .column(product::Column::ProductName)
        .column(product::Column::Image)
        .filter(product::Column::Id.is_in(ids))
        .into_model::<ProductCard>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.id, r)).collect())
}

/// Keep the referenced order and drop references whose target is gone.
pub fn ordered_cards(ids: &[Uuid], cards: &HashMap<Uuid, ProductCard>) -> Vec<ProductCard> {
    ids.iter().filter_map(|id| cards.get(id).cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(distinct([a, b, a, b]), vec![a, b]);
    }

    #[test]
    fn ordered_cards_skips_missing_targets() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let mut cards = HashMap::new();
        cards.insert(a, ProductCard { id: a, product_name: "A".into(), image: ProductImages::default() });
        cards.insert(b, ProductCard { id: b, product_name: "B".into(), image: ProductImages::default() });
        let out = ordered_cards(&[b, gone, a], &cards);
        assert_eq!(out.iter().map(|c| c.product_name.as_str()).collect::<Vec<_>>(), vec!["B", "A"]);
    }
}
