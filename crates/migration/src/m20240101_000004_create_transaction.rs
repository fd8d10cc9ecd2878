//! Create `transaction` table with FK to `user`.
//!
//! Product references live in a UUID array so their order is preserved.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(uuid(Transaction::Id).primary_key())
                    .col(uuid(Transaction::UserId).not_null())
                    .col(
                        array(Transaction::ProductIds, ColumnType::Uuid)
                            .not_null()
                            .default(Expr::cust("'{}'::uuid[]")),
                    )
                    .col(string_len(Transaction::Status, 16).not_null().default("Pending"))
                    .col(timestamp_with_time_zone(Transaction::Date).not_null())
                    .col(timestamp_with_time_zone(Transaction::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Transaction::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_user")
                            .from(Transaction::Table, Transaction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Transaction::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Transaction { Table, Id, UserId, ProductIds, Status, Date, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
