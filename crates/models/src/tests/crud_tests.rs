use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::setup_test_db;
use crate::enums::{Role, Status, Variant};
use crate::product::{NewProduct, ProductImage};
use crate::{comment, delivery, product, transaction, user};

fn unique_email() -> String { format!("crud_{}@example.com", Uuid::new_v4()) }

/// Create a user, a scheduled product and a delivery, then update and remove them
#[tokio::test]
async fn test_product_and_delivery_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let owner = user::create(&db, "Crud Owner", &unique_email(), Role::Admin, "hash".into()).await?;
    assert_eq!(owner.role, Role::Admin);

    let p = product::create(&db, NewProduct {
        user_id: owner.id,
        product_name: "Cement".into(),
        product_type: "Material".into(),
        class: "B".into(),
        variant: Variant::International,
        image: vec![ProductImage { public_id: "img1".into(), url: "https://cdn/1.png".into(), originalname: "1.png".into() }],
        schedule_id: None,
    }).await?;
    assert_eq!(p.image.0.len(), 1);

    let d = delivery::create(&db, delivery::NewDelivery {
        product_id: p.id,
        company_name: format!("Co {}", &Uuid::new_v4().to_string()[..8]),
        date: Utc::now().into(),
        price: 99.5,
        status: Status::Pending,
        quantity: 4,
    }).await?;
    assert_eq!(d.status, Status::Pending);

    let mut am: delivery::ActiveModel = d.clone().into();
    am.status = Set(Status::Completed);
    let updated = am.update(&db).await?;
    assert_eq!(updated.status, Status::Completed);

    let mut pam: product::ActiveModel = p.clone().into();
    pam.schedule_id = Set(Some(d.id));
    pam.update(&db).await?;
    let scheduled = product::Entity::find().filter(product::Column::ScheduleId.eq(d.id)).all(&db).await?;
    assert_eq!(scheduled.len(), 1);

    delivery::Entity::delete_by_id(d.id).exec(&db).await?;
    product::Entity::delete_by_id(p.id).exec(&db).await?;
    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

/// Transaction rows keep their product array order and comments hang off them
#[tokio::test]
async fn test_transaction_and_comment_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let buyer = user::create(&db, "Buyer", &unique_email(), Role::Customer, "hash".into()).await?;
    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    let t = transaction::create(&db, transaction::NewTransaction {
        user_id: buyer.id,
        product_ids: ids.clone(),
        date: Utc::now().into(),
    }).await?;
    assert_eq!(t.status, Status::Pending);

    let found = transaction::Entity::find_by_id(t.id).one(&db).await?.expect("transaction");
    assert_eq!(found.product_ids, ids);

    comment::create(&db, t.id, buyer.id, "left at the gate").await?;
    assert!(comment::create(&db, t.id, buyer.id, "  ").await.is_err());
    let res = comment::Entity::delete_many().filter(comment::Column::TransactionId.eq(t.id)).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);

    transaction::Entity::delete_by_id(t.id).exec(&db).await?;
    user::Entity::delete_by_id(buyer.id).exec(&db).await?;
    Ok(())
}

/// Emails are stored lower-cased and unique
#[tokio::test]
async fn test_user_email_unique() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let email = unique_email();
    let u = user::create(&db, "Once", &email.to_uppercase(), Role::Employee, "hash".into()).await?;
    assert_eq!(u.email, email.to_lowercase());
    assert!(user::create(&db, "Twice", &email, Role::Employee, "hash".into()).await.is_err());

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}
