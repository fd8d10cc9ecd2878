use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {}", e)))
}

/// Seed the configured admin account if it does not exist yet.
async fn bootstrap_admin(state: &ServerState, cfg: &AppConfig) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&cfg.auth.bootstrap_admin_email, &cfg.auth.bootstrap_admin_password) else {
        return Ok(());
    };
    match state.auth.ensure_admin("Administrator", email, password).await? {
        Some(user) => info!(user_id = %user.id, email = %user.email, "bootstrap admin created"),
        None => info!(email = %email, "bootstrap admin already present"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: connect, migrate, build the app and serve until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");

    let mailer = service::notify::mailer_from_config(&cfg.mail)?;
    let state = ServerState::from_db(db, (&cfg.auth).into(), mailer);
    bootstrap_admin(&state, &cfg).await?;

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_bad_host() {
        let mut cfg = configs::load_from_str("").unwrap();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 8081;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8081);
    }
}
