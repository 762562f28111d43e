use tokio::signal;
use tracing::warn;

/// 监听 Ctrl+C，触发优雅停机
pub async fn listen_for_shutdown() {
    signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
