//! Create `product` table with FK to `user`.
//!
//! `schedule_id` points at a delivery without a constraint; deliveries clean
//! up their scheduled products themselves.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::UserId).not_null())
                    .col(string_len(Product::ProductName, 30).not_null())
                    .col(string_len(Product::Type, 64).not_null())
                    .col(string_len(Product::Class, 64).not_null())
                    .col(string_len(Product::Variant, 16).not_null())
                    .col(json_binary(Product::Image).not_null())
                    .col(uuid_null(Product::ScheduleId))
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Product::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_user")
                            .from(Product::Table, Product::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, UserId, ProductName, Type, Class, Variant, Image, ScheduleId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
