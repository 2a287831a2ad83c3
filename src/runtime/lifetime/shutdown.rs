use std::time::Duration;

use actix_web::dev::ServerHandle;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 等待进行中请求完成的时间（秒）
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待 Ctrl+C / SIGTERM，然后优雅停止服务器
pub async fn listen_for_shutdown(handle: ServerHandle) {
    wait_for_signal().await;
    info!("Shutdown signal received, draining in-flight requests...");

    // stop(true) 会等待 worker 处理完已接收的请求
    match timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS + 1),
        handle.stop(true),
    )
    .await
    {
        Ok(()) => info!("HTTP server stopped gracefully"),
        Err(_) => error!(
            "Graceful shutdown timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    let mut terminate = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {}. Only Ctrl+C will stop the server.", e);
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        );
    }
}
