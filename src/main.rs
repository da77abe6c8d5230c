use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use std::sync::Arc;
use student_registry::{
    api::{self, ApiOptions},
    config, logging,
    records::RecordService,
    store::{MongoStudentStore, StudentStore},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing();

    let store = Arc::new(
        MongoStudentStore::connect(
            &config.mongodb_uri,
            &config.database_name,
            &config.collection_name,
        )
        .await
        .context("failed to create MongoDB client")?,
    );
    if let Err(err) = store.ping().await {
        tracing::error!(error = %err, "Error connecting to MongoDB");
        return Err(err).context("MongoDB did not answer ping");
    }
    tracing::info!(
        database = %config.database_name,
        collection = %config.collection_name,
        "Connected to MongoDB"
    );

    let service = RecordService::new(store.clone(), config.name_search_mode);
    let app = api::create_router_with(
        Arc::new(service),
        ApiOptions {
            legacy_delete_status: config.legacy_delete_status,
        },
    );

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    store.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
