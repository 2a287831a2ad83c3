#![allow(dead_code)]

pub mod mmdb;

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use ipinfo::errors::{IpInfoError, Result};
use ipinfo::services::{CityRecord, GeoIpLookup, GeoIpProvider, Language};

use mmdb::{MmdbBuilder, Value};

// =============================================================================
// 测试数据
// =============================================================================

/// 完整记录：有行政区划，中英文名称相同
pub const TESTLAND_IP: &str = "198.51.100.1";
/// 没有行政区划，中英文名称不同
pub const NORTHLAND_IP: &str = "192.0.2.10";
/// 公网但不在数据库中
pub const MISSING_IP: &str = "203.0.113.7";

pub const FIXTURE_BUILD_EPOCH: u64 = 1_700_000_000;

fn names(en: &str, zh: &str) -> Value {
    Value::map([("en", Value::str(en)), ("zh-CN", Value::str(zh))])
}

/// 构造包含两个网段的 GeoLite2-City 格式测试数据库
pub fn fixture_database() -> Vec<u8> {
    let testland = Value::map([
        (
            "city",
            Value::map([("names", names("Testville", "Testville"))]),
        ),
        (
            "country",
            Value::map([
                ("iso_code", Value::str("TL")),
                ("names", names("Testland", "Testland")),
            ]),
        ),
        (
            "location",
            Value::map([
                ("accuracy_radius", Value::U16(50)),
                ("latitude", Value::Double(12.34)),
                ("longitude", Value::Double(56.78)),
                ("metro_code", Value::U16(501)),
                ("time_zone", Value::str("Etc/GMT-4")),
            ]),
        ),
        (
            "subdivisions",
            Value::Array(vec![
                Value::map([("names", names("Test Province", "Test Province"))]),
                Value::map([("names", names("Inner County", "Inner County"))]),
            ]),
        ),
    ]);

    let northland = Value::map([
        ("city", Value::map([("names", names("Northville", "北城"))])),
        ("country", Value::map([("names", names("Northland", "北国"))])),
        (
            "location",
            Value::map([
                ("accuracy_radius", Value::U16(1000)),
                ("latitude", Value::Double(-33.5)),
                ("longitude", Value::Double(151.25)),
                ("time_zone", Value::str("Australia/Sydney")),
            ]),
        ),
    ]);

    MmdbBuilder::new("GeoLite2-City", FIXTURE_BUILD_EPOCH)
        .insert(Ipv4Addr::new(198, 51, 100, 0), 24, &testland)
        .insert(Ipv4Addr::new(192, 0, 2, 0), 24, &northland)
        .build()
}

// =============================================================================
// 内存中的假 provider
// =============================================================================

/// 按 (ip, 语言) 返回预设记录
#[derive(Default)]
pub struct FakeLookup {
    records: HashMap<(IpAddr, Language), CityRecord>,
}

impl FakeLookup {
    pub fn with(mut self, ip: &str, language: Language, record: CityRecord) -> Self {
        self.records.insert((ip.parse().unwrap(), language), record);
        self
    }

    pub fn into_provider(self) -> GeoIpProvider {
        GeoIpProvider::from_lookup(Arc::new(self))
    }
}

impl GeoIpLookup for FakeLookup {
    fn lookup_city(&self, ip: IpAddr, language: Language) -> Result<CityRecord> {
        self.records
            .get(&(ip, language))
            .cloned()
            .ok_or_else(|| IpInfoError::address_not_found(ip.to_string()))
    }

    fn name(&self) -> &'static str {
        "Fake"
    }
}

pub fn city_record(country: &str, province: &str, city: &str) -> CityRecord {
    CityRecord {
        country: country.to_string(),
        province: province.to_string(),
        city: city.to_string(),
        accuracy_radius: 20,
        latitude: 1.5,
        longitude: -2.25,
        metro_code: 0,
        time_zone: "Europe/Berlin".to_string(),
    }
}

/// 默认的假 provider：8.8.8.8 有中英文记录
pub fn fake_provider() -> GeoIpProvider {
    FakeLookup::default()
        .with("8.8.8.8", Language::ZhCn, city_record("美国", "加利福尼亚州", "山景城"))
        .with(
            "8.8.8.8",
            Language::En,
            city_record("United States", "California", "Mountain View"),
        )
        .with("1.1.1.1", Language::ZhCn, city_record("澳大利亚", "", ""))
        .into_provider()
}
