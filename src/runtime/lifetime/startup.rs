use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, StaticConfig};
use crate::services::GeoIpProvider;

/// 服务启动所需的全部共享状态
///
/// 构造完成后只读，由 HttpServer 的每个 worker 克隆引用
pub struct StartupContext {
    pub geoip: GeoIpProvider,
    pub api: ApiConfig,
}

/// 准备服务器启动的上下文
///
/// GeoIP 数据库在这里加载一次；失败时返回错误，调用方不应开始监听
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let geoip =
        GeoIpProvider::new(&config.geoip).context("Failed to initialize GeoIP database")?;

    if config.api.trusted_proxies.is_empty() {
        info!("Client IP: using TCP peer address only");
    } else {
        warn!(
            "Client IP: honouring X-Forwarded-For from trusted proxies {:?}",
            config.api.trusted_proxies
        );
    }

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        geoip,
        api: config.api.clone(),
    })
}
