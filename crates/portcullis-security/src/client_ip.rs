// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client IP resolution across proxy headers.
//!
//! Headers are consulted in [`CLIENT_IP_HEADERS`] order: edge-network vendor
//! headers first, the generic `X-Forwarded-For` family next, legacy
//! server-specific headers last. The first token, in the first header, that
//! parses as a public address wins. With no such token the transport remote
//! address is returned as-is, private or not, because a private peer is the
//! normal case for a server reached directly on an internal network.

use std::net::{IpAddr, Ipv4Addr};

use http::HeaderMap;
use tracing::trace;

use crate::ip::is_public_client_ip;
use crate::proxy::ProxyTrust;

/// Proxy headers in decreasing order of trust.
pub const CLIENT_IP_HEADERS: &[&str] = &[
    "cf-connecting-ip",
    "true-client-ip",
    "fastly-client-ip",
    "x-azure-clientip",
    "x-client-ip",
    "x-cluster-client-ip",
    "x-forwarded-for",
    "x-forwarded",
    "forwarded-for",
    "forwarded",
    "x-real-ip",
    "proxy-client-ip",
    "wl-proxy-client-ip",
    "http_x_forwarded_for",
    "http_client_ip",
];

/// Resolves the most trustworthy client address for a request.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpResolver {
    trusted_header_configured: bool,
}

impl ClientIpResolver {
    /// `trusted_header_configured` means an upstream layer has already
    /// rewritten the remote address from a trusted proxy header, so the
    /// generic headers must not be consulted again.
    pub fn new(trusted_header_configured: bool) -> Self {
        Self {
            trusted_header_configured,
        }
    }

    /// Build a resolver matching the proxy trust in effect.
    pub fn from_trust(trust: Option<&ProxyTrust>) -> Self {
        Self::new(trust.is_some())
    }

    pub fn trusted_header_configured(&self) -> bool {
        self.trusted_header_configured
    }

    /// Resolve the client address.
    ///
    /// Returns `None` only when there is no remote address (no connection).
    pub fn resolve(&self, headers: &HeaderMap, remote: Option<IpAddr>) -> Option<String> {
        let remote = remote?;

        if self.trusted_header_configured {
            return Some(remote.to_string());
        }

        match public_ip_from_headers(headers) {
            Some((header, ip)) => {
                trace!(header, client_ip = %ip, "client IP taken from proxy header");
                Some(ip.to_string())
            }
            None => Some(remote.to_string()),
        }
    }
}

/// First public address found across [`CLIENT_IP_HEADERS`], with the header it came from.
pub fn public_ip_from_headers(headers: &HeaderMap) -> Option<(&'static str, IpAddr)> {
    CLIENT_IP_HEADERS.iter().find_map(|&name| {
        headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .flat_map(|value| value.split(','))
            .filter_map(parse_token)
            .find(is_public_client_ip)
            .map(|ip| (name, ip))
    })
}

/// Parse one comma-separated token of a proxy header.
///
/// Besides bare addresses this accepts the forms proxies commonly emit:
/// quoted values, RFC 7239 `for=` pairs, `[v6]:port` and `v4:port`.
pub fn parse_token(token: &str) -> Option<IpAddr> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let value = if token.contains('=') {
        forwarded_for_value(token)?
    } else {
        token
    };
    let value = value.trim().trim_matches('"');

    if let Ok(ip) = value.parse::<IpAddr>() {
        return Some(ip);
    }

    if let Some(rest) = value.strip_prefix('[') {
        let (inner, _) = rest.split_once(']')?;
        return inner.parse().ok();
    }

    let (host, port) = value.rsplit_once(':')?;
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    host.parse::<Ipv4Addr>().ok().map(IpAddr::V4)
}

/// Value of the `for` parameter in an RFC 7239 element such as `for=1.2.3.4;proto=https`.
fn forwarded_for_value(element: &str) -> Option<&str> {
    element.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        key.trim().eq_ignore_ascii_case("for").then_some(value)
    })
}
