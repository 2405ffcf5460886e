//! Client identity extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Returns the rate-limiting identity for a request.
///
/// The identity is the client IP address without the port, so every
/// connection from the same host shares one bucket.
///
/// When `behind_proxy` is `true`, the first valid address in `X-Forwarded-For`
/// wins, then `X-Real-IP`, then the socket peer. Forwarding headers are
/// ignored otherwise, since any client can set them.
///
/// # Examples
///
/// ```ignore
/// let peer: SocketAddr = "203.0.113.7:51234".parse().unwrap();
/// assert_eq!(client_identity(&HeaderMap::new(), peer, false), "203.0.113.7");
/// ```
pub fn client_identity(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip.to_string();
    }

    peer.ip().to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    })
}
