use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{debug, trace, warn};

use crate::api::middleware::RequestId;
use crate::config::ApiConfig;
use crate::services::{GeoIpProvider, Language, LocationInfo};
use crate::utils::{extract_client_ip, is_public_ip};

/// 客户端地址无法确定时的响应内容
pub const UNKNOWN_CLIENT_MESSAGE: &str = "unable to determine client ip";

#[derive(Debug, Default, PartialEq)]
pub struct LookupQuery {
    pub language: Option<String>,
}

impl LookupQuery {
    /// 解析 query string，重复的 key 取第一个值
    ///
    /// 按键值对序列解析，重复 key、未知 key 和非法转义都不会导致整体失败
    pub fn parse(query_string: &str) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string)
            .map(web::Query::into_inner)
            .unwrap_or_default();

        Self {
            language: pairs
                .into_iter()
                .find(|(key, _)| key == "language")
                .map(|(_, value)| value),
        }
    }
}

pub struct LookupService;

impl LookupService {
    pub async fn handle_lookup(
        req: HttpRequest,
        geoip: web::Data<GeoIpProvider>,
        api: web::Data<ApiConfig>,
    ) -> impl Responder {
        let query = LookupQuery::parse(req.query_string());
        let language = Language::from_param(query.language.as_deref());

        let ip = match extract_client_ip(&req, &api.trusted_proxies) {
            Ok(ip) => ip,
            Err(e) => {
                let request_id = RequestId::of(&req);
                warn!(
                    request_id = request_id.as_ref().map_or("-", RequestId::as_str),
                    "Rejecting request without usable client address: {}", e
                );
                return Self::bad_request(UNKNOWN_CLIENT_MESSAGE.to_string());
            }
        };

        if !is_public_ip(&ip) {
            trace!("{} is a local network address", ip);
            return Self::json_response(&LocationInfo::local_network(ip, language));
        }

        match geoip.lookup_city(ip, language) {
            Ok(record) => Self::json_response(&LocationInfo::from_record(ip, record)),
            Err(e) => {
                debug!("GeoIP lookup failed: {}", e);
                Self::bad_request(format!("{} is invalid ip", ip))
            }
        }
    }

    #[inline]
    fn json_response(info: &LocationInfo) -> HttpResponse {
        HttpResponse::Ok()
            .insert_header(("Content-Type", "application/json"))
            .json(info)
    }

    #[inline]
    fn bad_request(message: String) -> HttpResponse {
        HttpResponse::build(StatusCode::BAD_REQUEST)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("X-Content-Type-Options", "nosniff"))
            .body(message)
    }
}

/// 所有路径、所有方法都交给同一个 handler
pub fn lookup_routes() -> actix_web::Resource {
    web::resource("/{tail:.*}").route(web::route().to(LookupService::handle_lookup))
}
