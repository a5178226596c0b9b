// Main entry point for the management API server

use std::sync::Arc;

use anyhow::{Context, Result};
use management_core::common::MultisigGuard;
use management_core::kernel::{BaseStore, MemoryStore, PostgresStore, ServerDeps};
use management_core::{server::build_app, Config, StorageBackend};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,management_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Management API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Keychain and scope policies are fixed for the life of the process
    let guard = MultisigGuard::load(&config.security_config_path).with_context(|| {
        format!(
            "Failed to load security config from {}",
            config.security_config_path.display()
        )
    })?;
    tracing::info!(
        scopes = ?guard.registry().scope_names().collect::<Vec<_>>(),
        "Security config loaded"
    );
    for scope in guard.registry().scope_names() {
        let policy = guard.registry().lookup(scope)?;
        tracing::info!(
            scope,
            permitted = ?policy.permitted_signers(),
            mandatory = ?policy.mandatory_signers(),
            "Scope policy"
        );
    }

    let store: Arc<dyn BaseStore> = match &config.storage {
        StorageBackend::Postgres { database_url } => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations complete");

            Arc::new(PostgresStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; state is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Build application
    let app = build_app(ServerDeps::new(store, guard, config.rules));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
