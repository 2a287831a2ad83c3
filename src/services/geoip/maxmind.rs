//! MaxMind GeoLite2 数据库实现
//!
//! 数据库整体读入内存，之后只读；`Reader` 本身可以跨线程共享。

use std::io::ErrorKind;
use std::net::IpAddr;

use maxminddb::{Reader, geoip2};
use rust_embed::Embed;
use tracing::trace;

use super::provider::{CityRecord, GeoIpLookup};
use crate::errors::{IpInfoError, Result};
use crate::services::Language;

/// 随二进制分发的数据库文件名
pub const BUNDLED_DATABASE: &str = "GeoLite2-City.mmdb";

// release 构建时嵌入 data/ 目录，debug 构建时从磁盘读取
#[derive(Embed)]
#[folder = "data/"]
struct GeoDatabaseAssets;

/// MaxMind GeoIP Provider
pub struct MaxMindProvider {
    reader: Reader<Vec<u8>>,
    source: String,
}

impl MaxMindProvider {
    /// 从文件路径加载
    pub fn open(path: &str) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                IpInfoError::database_not_found(format!("{} does not exist", path))
            }
            _ => IpInfoError::database_load(format!("failed to read {}: {}", path, e)),
        })?;
        Self::from_bytes(bytes, path)
    }

    /// 加载编译进二进制的数据库
    pub fn bundled() -> Result<Self> {
        let file = GeoDatabaseAssets::get(BUNDLED_DATABASE).ok_or_else(|| {
            IpInfoError::database_not_found(format!(
                "bundled {} is missing, place it under data/ and rebuild",
                BUNDLED_DATABASE
            ))
        })?;
        Self::from_bytes(file.data.into_owned(), format!("bundled {}", BUNDLED_DATABASE))
    }

    /// 从内存中的数据库内容构造
    pub fn from_bytes(bytes: Vec<u8>, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let reader = Reader::from_source(bytes)
            .map_err(|e| IpInfoError::database_load(format!("{}: {}", source, e)))?;
        Ok(Self { reader, source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }

    pub fn build_epoch(&self) -> u64 {
        self.reader.metadata.build_epoch
    }
}

fn localized(names: &geoip2::Names<'_>, language: Language) -> String {
    let name = match language {
        Language::ZhCn => names.simplified_chinese,
        Language::En => names.english,
    };
    name.unwrap_or_default().to_string()
}

impl GeoIpLookup for MaxMindProvider {
    fn lookup_city(&self, ip: IpAddr, language: Language) -> Result<CityRecord> {
        let not_found = |reason: String| {
            trace!("MaxMind lookup for {} failed: {}", ip, reason);
            IpInfoError::address_not_found(ip.to_string())
        };

        let result = self.reader.lookup(ip).map_err(|e| not_found(e.to_string()))?;
        let city: geoip2::City = result
            .decode()
            .map_err(|e| not_found(e.to_string()))?
            .ok_or_else(|| not_found("no record".to_string()))?;

        // 部分国家没有行政区划，此时省份为空
        let province = city
            .subdivisions
            .first()
            .map(|sub| localized(&sub.names, language))
            .unwrap_or_default();

        let record = CityRecord {
            country: localized(&city.country.names, language),
            province,
            city: localized(&city.city.names, language),
            accuracy_radius: city.location.accuracy_radius.unwrap_or_default(),
            latitude: city.location.latitude.unwrap_or_default(),
            longitude: city.location.longitude.unwrap_or_default(),
            metro_code: city.location.metro_code.unwrap_or_default(),
            time_zone: city.location.time_zone.unwrap_or_default().to_string(),
        };

        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip, record.country, record.city
        );

        Ok(record)
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
