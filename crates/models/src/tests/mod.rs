use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::db::connect;


/// CRUD operations tests for all entities
pub mod crud_tests;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connect and make sure the schema is current; migrations run once per process.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect().await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    connect().await
}
