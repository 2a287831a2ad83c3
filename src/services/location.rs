//! 响应模型：语言选择与 LocationInfo 构造

use std::net::IpAddr;

use serde::Serialize;
use strum::{AsRefStr, EnumIter, EnumString};

use super::geoip::CityRecord;

/// 支持的输出语言
///
/// 未知或缺失的语言一律回退到简体中文
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, AsRefStr)]
pub enum Language {
    #[default]
    #[strum(serialize = "zh-CN")]
    ZhCn,
    #[strum(serialize = "en")]
    En,
}

impl Language {
    /// 从 query 参数解析，大小写敏感，与 GeoLite2 的语言标签一致
    pub fn from_param(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse::<Language>().ok())
            .unwrap_or_default()
    }

    /// 内网地址的本地化名称
    pub fn local_network_name(self) -> &'static str {
        match self {
            Language::ZhCn => "局域网",
            Language::En => "local network",
        }
    }
}

/// 坐标与时区信息
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub accuracy_radius: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub metro_code: u16,
    pub time_zone: String,
}

/// 单次请求的查询结果
///
/// 只能通过 `local_network` 或 `from_record` 构造，
/// 两种形态互斥：要么完全来自数据库，要么只有 ip 与本地网络标签
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInfo {
    pub ip: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub location: Location,
}

impl LocationInfo {
    /// 内网/本地地址的固定响应
    pub fn local_network(ip: IpAddr, language: Language) -> Self {
        Self {
            ip: ip.to_string(),
            country: String::new(),
            province: String::new(),
            city: language.local_network_name().to_string(),
            location: Location::default(),
        }
    }

    /// 由数据库记录构造
    pub fn from_record(ip: IpAddr, record: CityRecord) -> Self {
        Self {
            ip: ip.to_string(),
            country: record.country,
            province: record.province,
            city: record.city,
            location: Location {
                accuracy_radius: record.accuracy_radius,
                latitude: record.latitude,
                longitude: record.longitude,
                metro_code: record.metro_code,
                time_zone: record.time_zone,
            },
        }
    }
}
