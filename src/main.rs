mod api;
mod application;
mod domain;
mod infrastructure;
mod ports;

use api::AppState;
use infrastructure::AppConfig;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Payment Request demo...");

    let config = AppConfig::from_env()?;
    info!(
        gateway_delay_ms = config.gateway_delay.as_millis() as u64,
        notice_duration_ms = config.notice_duration.as_millis() as u64,
        "Configuration loaded"
    );

    // 关闭信号，用于中断进行中的网关等待
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let app_state = AppState {
        config: config.clone(),
        shutdown: shutdown_rx,
    };

    let app = api::create_router(app_state);

    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /       - Demo page");
    info!("  GET  /health - Health check");
    info!("  GET  /ws     - View session WebSocket");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    Ok(())
}
