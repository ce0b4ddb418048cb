use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensor_dash::common::AppState;
use sensor_dash::config::Config;
use sensor_dash::routes;
use sensor_dash::sensors::SensorClient;
use sensor_dash::static_site;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env may also carry LOG_FORMAT / RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting sensor-dash...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        sensor_api = %config.sensor_api_base_url,
        sensors = config.sensors.len(),
        host = %config.api_host,
        port = config.api_port,
        "Configuration loaded"
    );
    if config.table_page_size != config.chart_page_size {
        tracing::warn!(
            table_page_size = config.table_page_size,
            chart_page_size = config.chart_page_size,
            "Table and chart sessions advance by different page sizes"
        );
    }

    if config.build_static {
        let path = static_site::generate(&config.static_output_dir, &config)?;
        tracing::info!(path = %path.display(), "Static dashboard written, exiting");
        return Ok(());
    }

    let client = SensorClient::from_config(&config)?;
    tracing::info!(base_url = %client.base_url(), "Sensor API client initialized");

    let addr = config.bind_address();
    let state = AppState::new(config, client);

    let app = routes::build_router(state);

    // Start server with graceful shutdown
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    // Peer addresses feed the chart rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sensor_dash=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
