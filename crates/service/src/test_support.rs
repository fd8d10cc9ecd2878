#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::{connect_with_config, DATABASE_URL};
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    DatabaseConfig {
        url: DATABASE_URL.clone(),
        max_connections: 20,
        min_connections: 1,
        acquire_timeout_secs: 10,
        ..Default::default()
    }
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&test_config()).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    // Fresh connection for the current test's runtime
    connect_with_config(&test_config()).await
}

/// Insert a throwaway user and return its id.
pub async fn seed_user(db: &DatabaseConnection, name: &str) -> Result<uuid::Uuid, anyhow::Error> {
    let email = format!("{}_{}@example.com", name.to_lowercase(), uuid::Uuid::new_v4());
    let user = models::user::create(db, name, &email, models::enums::Role::Customer, "x".into()).await?;
    Ok(user.id)
}
