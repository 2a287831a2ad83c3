//! Access log middleware
//!
//! 每个请求结束时记录状态码与耗时。查询全部在内存中完成，
//! 超过 `SLOW_REQUEST_THRESHOLD` 的请求提升为 warn。

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 慢请求阈值
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(100);

#[derive(Clone, Default)]
pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService {
            service: Rc::new(service),
        }))
    }
}

pub struct TimingService<S> {
    service: Rc<S>,
}

/// 按状态码与耗时选择日志级别
fn log_completion(status: StatusCode, elapsed: Duration) {
    let code = status.as_u16();
    if elapsed >= SLOW_REQUEST_THRESHOLD {
        warn!(status = code, "Slow request: {:?}", elapsed);
    } else if status.is_server_error() {
        info!(status = code, "Request failed in {:?}", elapsed);
    } else {
        debug!(status = code, "Request completed in {:?}", elapsed);
    }
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();

        Box::pin(async move {
            let result = srv.call(req).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(response) => log_completion(response.status(), elapsed),
                Err(e) => warn!("Request errored after {:?}: {}", elapsed, e),
            }

            result
        })
    }
}
