//! Callback server for the VoguePay gateway.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use voguepay_gateway::adapters::{
    callback_router, CallbackAppState, InMemoryGatewayConfigStore, PostgresClientRepository,
    PostgresGatewayLog, PostgresInvoiceRepository, PostgresSettlementLedger, VoguePayClient,
    VoguePayConfig,
};
use voguepay_gateway::application::CallbackPorts;
use voguepay_gateway::config::{AppConfig, DatabaseConfig};

/// Upper bound for a whole callback, including a lookup query.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(150);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let config_store = Arc::new(InMemoryGatewayConfigStore::new());
    match config.gateway_settings() {
        Some(settings) => config_store.activate(settings).await,
        None => tracing::warn!(
            module = %config.gateway.module_name,
            "Gateway module disabled; callbacks will be refused"
        ),
    }

    let processor = Arc::new(VoguePayClient::new(VoguePayConfig::new(
        config.gateway.api_url.clone(),
        config.gateway.request_timeout(),
    ))?);

    let database = config
        .database
        .as_ref()
        .ok_or("the callback server needs the host database (VOGUEPAY__DATABASE__URL)")?;
    let pool = connect(database).await?;

    let ports = CallbackPorts {
        config_store,
        processor,
        invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        clients: Arc::new(PostgresClientRepository::new(pool.clone())),
        ledger: Arc::new(PostgresSettlementLedger::new(pool.clone())),
        gateway_log: Arc::new(PostgresGatewayLog::new(pool)),
    };
    let state = CallbackAppState::new(
        ports,
        config.gateway.module_name.as_str(),
        config.server.system_url.as_str(),
    );

    let app = callback_router()
        .with_state(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        demo = config.gateway.demo_mode,
        environment = ?config.server.environment,
        "Callback server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect(database: &DatabaseConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        PostgresSettlementLedger::new(pool.clone()).migrate().await?;
        tracing::info!("Database migrations applied");
    }
    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
