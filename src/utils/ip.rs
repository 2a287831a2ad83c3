//! IP 地址处理工具
//!
//! - 公网 / 内网地址分类
//! - 客户端 IP 提取（默认只信任 TCP 对端地址，可选可信代理）
//! - CIDR 匹配

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use actix_web::HttpRequest;
use tracing::debug;

use crate::errors::{IpInfoError, Result};

/// 判断地址是否可以进入 GeoIP 查询
///
/// 以下地址视为内网/本地：
/// - 环回地址
/// - 链路本地单播（169.254.0.0/16, fe80::/10）
/// - 链路本地组播（224.0.0.0/24, ff02::/16）
/// - IPv4 私有网段 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
///
/// IPv6 只排除环回和链路本地，ULA（fc00::/7）仍按公网处理。
/// IPv4-mapped IPv6 按其内嵌的 IPv4 地址分类。
pub fn is_public_ip(ip: &IpAddr) -> bool {
    match ip.to_canonical() {
        IpAddr::V4(v4) => is_public_ipv4(&v4),
        IpAddr::V6(v6) => is_public_ipv6(&v6),
    }
}

fn is_public_ipv4(ip: &Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    let link_local_multicast = a == 224 && b == 0 && c == 0;

    !(ip.is_loopback() || ip.is_link_local() || link_local_multicast || ip.is_private())
}

fn is_public_ipv6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let link_local_unicast = (first & 0xffc0) == 0xfe80;
    let link_local_multicast = (first & 0xff0f) == 0xff02;

    !(ip.is_loopback() || link_local_unicast || link_local_multicast)
}

/// 检查配置项是否为合法的单 IP 或 CIDR
pub fn is_valid_proxy_entry(entry: &str) -> bool {
    match entry.split_once('/') {
        Some((network, prefix_len)) => {
            let Ok(prefix_len) = prefix_len.parse::<u8>() else {
                return false;
            };
            match network.parse::<IpAddr>() {
                Ok(IpAddr::V4(_)) => prefix_len <= 32,
                Ok(IpAddr::V6(_)) => prefix_len <= 128,
                Err(_) => false,
            }
        }
        None => entry.parse::<IpAddr>().is_ok(),
    }
}

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &IpAddr, trusted_proxies: &[String]) -> bool {
    let ip = ip.to_canonical();
    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|proxy_addr| ip == proxy_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): std::result::Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 确定客户端 IP（核心逻辑）
///
/// 1. 没有对端地址 → 错误
/// 2. 对端在 trusted_proxies 中 → 使用转发头中的地址（缺失时回退到对端）
/// 3. 其它情况 → 对端地址，不看任何请求头
///
/// 返回的地址已规范化：IPv4-mapped IPv6 转为 IPv4
pub fn resolve_client_ip<F>(
    peer: Option<SocketAddr>,
    trusted_proxies: &[String],
    get_forwarded_ip: F,
) -> Result<IpAddr>
where
    F: FnOnce() -> Option<String>,
{
    let peer_ip = peer
        .map(|addr| addr.ip().to_canonical())
        .ok_or_else(|| IpInfoError::invalid_client_address("missing peer address"))?;

    if trusted_proxies.is_empty() || !is_trusted_proxy(&peer_ip, trusted_proxies) {
        return Ok(peer_ip);
    }

    match get_forwarded_ip() {
        Some(forwarded) => {
            let real_ip = forwarded.parse::<IpAddr>().map_err(|_| {
                IpInfoError::invalid_client_address(format!(
                    "malformed forwarded address '{}' from proxy {}",
                    forwarded, peer_ip
                ))
            })?;
            debug!("Trusted proxy {} -> {}", peer_ip, real_ip);
            Ok(real_ip.to_canonical())
        }
        None => {
            debug!("Trusted proxy {} sent no forwarded header", peer_ip);
            Ok(peer_ip)
        }
    }
}

/// 从 HttpRequest 提取客户端 IP
pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Result<IpAddr> {
    resolve_client_ip(req.peer_addr(), trusted_proxies, || {
        extract_forwarded_ip_from_headers(req.headers())
    })
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(
    headers: &actix_web::http::header::HeaderMap,
) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            // 其次 X-Real-IP
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}
