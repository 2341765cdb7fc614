//! ClubHub HTTP server binary.
//!
//! Wires configuration, PostgreSQL storage, metrics, and notification
//! dispatch into the Axum router, then serves until Ctrl+C or SIGTERM.

use clubhub_core::environment::SystemClock;
use clubhub_core::notify::Notifier;
use clubhub_postgres::{PostgresDirectoryRepository, PostgresEventRepository};
use clubhub_server::config::Config;
use clubhub_server::metrics::register_business_metrics;
use clubhub_server::notify::{ConsoleNotifier, Dispatcher, WebhookNotifier};
use clubhub_server::server::{AppState, build_router};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment file first, so RUST_LOG from .env reaches the subscriber
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubhub_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ClubHub HTTP server");

    let config = Config::from_env();
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    // The recorder must be installed before anything increments a counter
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {e}"))?;
    register_business_metrics();

    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout))
        .connect(&config.database.url)
        .await?;
    let events = PostgresEventRepository::new(pool.clone());
    events.migrate().await?;
    let directory = PostgresDirectoryRepository::new(pool);
    info!("Database ready");

    let notifier: Arc<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => {
            info!(url = %url, "Webhook notifications enabled");
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            info!("No webhook configured; notifications print to the log");
            Arc::new(ConsoleNotifier::new())
        }
    };

    if config.admin.api_key.is_none() {
        warn!("ADMIN_API_KEY is not set; admin endpoints will reject every request");
    }

    let state = AppState::new(
        Arc::new(events),
        Arc::new(directory),
        Dispatcher::new(notifier),
        Arc::new(SystemClock),
        config.admin.api_key.clone(),
    );
    let app = build_router(state);

    // Metrics exporter on its own port, away from the public API
    let metrics_addr = format!(
        "{}:{}",
        config.server.metrics_host, config.server.metrics_port
    );
    let metrics_router = axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || {
            let handle = metrics_handle.clone();
            async move { handle.render() }
        }),
    );
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
    info!(address = %metrics_addr, "Metrics endpoint listening");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_router).await {
            error!(error = %err, "Metrics server stopped unexpectedly");
        }
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process is asked to stop.
///
/// A failed handler install is logged and that arm parks forever rather than
/// tearing the server down at startup.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
