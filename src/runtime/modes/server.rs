//! Server mode
//!
//! Loads the GeoIP database, then binds the HTTP listener and routes every
//! request to the lookup handler.

use actix_web::{
    App, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::lookup_routes;
use crate::config::{ApiConfig, StaticConfig};
use crate::runtime::lifetime;
use crate::services::GeoIpProvider;

/// worker 数量上限
const MAX_WORKERS: usize = 32;

/// 组装 App：中间件栈、共享状态与 catch-all 路由
pub fn build_app(
    geoip: web::Data<GeoIpProvider>,
    api: web::Data<ApiConfig>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(TimingMiddleware) // 最外层，记录请求延迟
        .wrap(RequestIdMiddleware)
        .wrap(Compress::default())
        .app_data(geoip)
        .app_data(api)
        .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
        .service(lookup_routes())
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let startup = lifetime::prepare_server_startup(&config)?;

    let geoip = web::Data::new(startup.geoip);
    let api = web::Data::new(startup.api);

    let cpu_count = config.server.cpu_count.min(MAX_WORKERS);
    info!("Using {} worker threads", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || build_app(geoip.clone(), api.clone()))
        .keep_alive(std::time::Duration::from_secs(30))
        .client_request_timeout(std::time::Duration::from_millis(5000))
        .client_disconnect_timeout(std::time::Duration::from_millis(1000))
        .workers(cpu_count)
        .shutdown_timeout(lifetime::shutdown::SHUTDOWN_TIMEOUT_SECS)
        .disable_signals()
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    warn!("Starting server at http://{}", bind_address);

    actix_web::rt::spawn(lifetime::shutdown::listen_for_shutdown(server.handle()));

    server.await.context("HTTP server terminated with an error")?;

    info!("Server stopped");
    Ok(())
}
