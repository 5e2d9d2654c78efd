use tokio::signal;
use tracing::{error, warn};

use crate::realtime::{ConnectionRegistry, ServerEvent};

/// 等待 Ctrl+C，随后通知所有在线客户端
pub async fn listen_for_shutdown(registry: std::sync::Arc<ConnectionRegistry>) {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        // 无法监听信号时让服务器继续运行
        std::future::pending::<()>().await;
    }
    warn!(
        "Shutdown signal received, closing {} realtime connection(s)...",
        registry.connection_count()
    );
    let _ = registry.broadcast(&ServerEvent::error("Server is shutting down"));
}
