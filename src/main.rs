use nextpay_checkout::api::{self, checkout::CheckoutState};
use nextpay_checkout::config::AppConfig;
use nextpay_checkout::logging::{init_tracing, mask_secret};
use nextpay_checkout::orders::InMemoryOrderStore;
use nextpay_checkout::payments::providers::NextpayClient;
use nextpay_checkout::services::NextpayCheckout;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging);
    config.validate().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        app_url = %config.checkout.app_url,
        currency = %config.checkout.currency,
        "Starting Nextpay checkout service"
    );
    info!(
        base_url = %config.nextpay.base_url,
        api_key = %mask_secret(&config.nextpay.api_key),
        timeout_secs = config.nextpay.timeout_secs,
        "Nextpay configuration loaded"
    );

    let gateway = Arc::new(NextpayClient::new(config.nextpay.clone())?);
    // Orders belong to the host platform; the in-memory store only serves
    // standalone runs.
    let store = Arc::new(InMemoryOrderStore::new());
    warn!("Using in-memory order store; orders do not survive restarts");

    let checkout = Arc::new(NextpayCheckout::new(
        gateway,
        store,
        config.checkout.clone(),
        config.nextpay.api_key.clone(),
    ));
    let app = api::router(CheckoutState { checkout });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to address {}: {}", addr, e);
        e
    })?;

    info!(address = %addr, "Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
