//! Create `delivery` table.
//!
//! `product_id` is a soft reference: a removed product leaves the delivery in
//! place and population yields `null`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Delivery::Table)
                    .if_not_exists()
                    .col(uuid(Delivery::Id).primary_key())
                    .col(uuid(Delivery::ProductId).not_null())
                    .col(string_len(Delivery::CompanyName, 30).not_null())
                    .col(timestamp_with_time_zone(Delivery::Date).not_null())
                    .col(double(Delivery::Price).not_null())
                    .col(string_len(Delivery::Status, 16).not_null().default("Pending"))
                    .col(integer(Delivery::Quantity).not_null())
                    .col(timestamp_with_time_zone(Delivery::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Delivery::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Delivery::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Delivery { Table, Id, ProductId, CompanyName, Date, Price, Status, Quantity, CreatedAt, UpdatedAt }
