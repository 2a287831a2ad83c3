//! GeoIP 服务模块
//!
//! 基于 MaxMind GeoLite2-City 离线数据库的城市级查询：
//! - 数据库在启动时加载一次，之后只读共享
//! - 默认使用编译进二进制的数据库，可通过配置指定外部文件

mod maxmind;
mod provider;

pub use maxmind::{BUNDLED_DATABASE, MaxMindProvider};
pub use provider::{CityRecord, GeoIpLookup, GeoIpProvider};
