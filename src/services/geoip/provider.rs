//! GeoIP Provider 抽象层
//!
//! 启动时根据配置选择数据来源：
//! 1. 配置了 geoip.database_path → 从该文件加载
//! 2. 未配置 → 使用编译进二进制的 GeoLite2-City.mmdb
//!
//! 任一来源加载失败都直接返回错误，由调用方终止启动。

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info};

use super::maxmind::MaxMindProvider;
use crate::config::GeoIpConfig;
use crate::errors::Result;
use crate::services::Language;

/// 一次城市级查询的结果，名称已按请求语言本地化
///
/// 数据库没有对应语言的名称时为空字符串，缺失的数值字段为 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityRecord {
    pub country: String,
    pub province: String,
    pub city: String,
    pub accuracy_radius: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub metro_code: u16,
    pub time_zone: String,
}

/// GeoIP 查询 trait
///
/// 实现必须是只读的：同一个实例会被所有 worker 并发调用
pub trait GeoIpLookup: Send + Sync {
    /// 查询公网地址；地址不在数据库中时返回 `IpInfoError::AddressNotFound`
    fn lookup_city(&self, ip: IpAddr, language: Language) -> Result<CityRecord>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一 GeoIP Provider
///
/// 启动时构造一次，之后通过 `Arc` 共享给所有请求
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    /// 根据 GeoIpConfig 初始化
    pub fn new(config: &GeoIpConfig) -> Result<Self> {
        let provider = match config.database_path {
            Some(ref path) => {
                debug!("GeoIP: Loading database from {}", path);
                MaxMindProvider::open(path)?
            }
            None => {
                debug!("GeoIP: No database_path configured, using bundled database");
                MaxMindProvider::bundled()?
            }
        };

        info!(
            "GeoIP: Loaded {} database from {} (build epoch {})",
            provider.database_type(),
            provider.source(),
            provider.build_epoch()
        );

        Ok(Self::from_lookup(Arc::new(provider)))
    }

    /// 使用现成的实现构造
    pub fn from_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner }
    }

    /// 查询 IP 地址的地理位置
    pub fn lookup_city(&self, ip: IpAddr, language: Language) -> Result<CityRecord> {
        self.inner.lookup_city(ip, language)
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}
