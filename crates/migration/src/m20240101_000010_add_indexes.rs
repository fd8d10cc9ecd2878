use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Newest-first listings
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_delivery_created_at")
                    .table(Delivery::Table)
                    .col(Delivery::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transaction_created_at")
                    .table(Transaction::Table)
                    .col(Transaction::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transaction_user")
                    .table(Transaction::Table)
                    .col(Transaction::UserId)
                    .to_owned(),
            )
            .await?;

        // Cascade lookups
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_schedule")
                    .table(Product::Table)
                    .col(Product::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comment_transaction")
                    .table(Comment::Table)
                    .col(Comment::TransactionId)
                    .to_owned(),
            )
            .await?;

        // Case-insensitive duplicate checks on company names
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_delivery_company_name_lower ON delivery (lower(company_name))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_delivery_created_at").table(Delivery::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_transaction_created_at").table(Transaction::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_transaction_user").table(Transaction::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_product_schedule").table(Product::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_comment_transaction").table(Comment::Table).to_owned()).await?;
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_delivery_company_name_lower")
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Delivery { Table, CreatedAt }

#[derive(DeriveIden)]
enum Transaction { Table, CreatedAt, UserId }

#[derive(DeriveIden)]
enum Product { Table, ScheduleId }

#[derive(DeriveIden)]
enum Comment { Table, TransactionId }
