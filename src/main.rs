//! Credit Accounts server
//!
//! Reads configuration from TOML (`$ACCOUNTS_CONFIG` or
//! ~/.config/credit-accounts/config.toml), migrates the database and serves
//! the account API until SIGINT/SIGTERM.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use credit_accounts::config::{AppConfig, LogFormat, LoggingConfig};
use credit_accounts::infrastructure::database::migrator::Migrator;
use credit_accounts::shared::{listen_for_shutdown_signals, ShutdownSignal};
use credit_accounts::{
    create_api_router, default_config_path, init_database, AccountState, UserRepository,
};

fn init_logging(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    match cfg.format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = default_config_path();
    let app_cfg = match AppConfig::load_with_env(&config_path) {
        Ok(cfg) => {
            init_logging(&cfg.logging);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let jwt_config = app_cfg.jwt_config()?;

    let password_scheme = app_cfg.security.password_scheme;
    tokio::task::spawn_blocking(move || password_scheme.dummy_digest().map(|_| ())).await??;

    let db = init_database(&app_cfg.database_config()).await?;

    info!("Running database migrations...");
    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    let state = AccountState {
        users: Arc::new(UserRepository::new(db.clone())),
        jwt_config,
        password_scheme,
        cookie: app_cfg.cookie.clone(),
    };
    let app = create_api_router(state);

    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Account API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs", addr);

    let api_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("Account API received shutdown signal");
        })
        .await?;

    if let Err(e) = db.close().await {
        error!("Error closing database connection: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}
