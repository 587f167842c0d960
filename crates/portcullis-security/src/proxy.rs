// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trusted reverse-proxy context.
//!
//! A [`ProxyTrust`] names the single header a trusted proxy sets and,
//! optionally, the peers allowed to set it. It is built once from
//! configuration and shared read-only.

use std::net::IpAddr;

use http::{HeaderMap, HeaderName};
use portcullis_config::model::{ProxyConfig, MAX_TRUSTED_HEADER_LEN};
use portcullis_core::validate::is_valid_header_name;
use portcullis_core::PortcullisError;
use tracing::debug;

use crate::client_ip::parse_token;

/// The configured trusted proxy header and the peers allowed to set it.
#[derive(Debug, Clone)]
pub struct ProxyTrust {
    header: HeaderName,
    known_proxies: Vec<IpAddr>,
}

impl ProxyTrust {
    /// Build a trust context from a header name and a list of proxy addresses.
    ///
    /// An empty `known_proxies` trusts the header from any peer.
    pub fn new(header: &str, known_proxies: Vec<IpAddr>) -> Result<Self, PortcullisError> {
        if !is_valid_header_name(header, MAX_TRUSTED_HEADER_LEN) {
            return Err(PortcullisError::Config(format!(
                "trusted header `{header}` must be an HTTP token of 1..={MAX_TRUSTED_HEADER_LEN} characters"
            )));
        }
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| PortcullisError::Config(format!("trusted header `{header}`: {e}")))?;
        Ok(Self {
            header,
            known_proxies,
        })
    }

    /// Build the trust context described by `[proxy]`.
    ///
    /// Returns `Ok(None)` when no header is configured or the process runs in
    /// a container, where the orchestrator's network is not a trusted proxy.
    pub fn from_config(config: &ProxyConfig) -> Result<Option<Self>, PortcullisError> {
        if config.running_in_container {
            debug!("running in a container, proxy trust disabled");
            return Ok(None);
        }
        let Some(header) = config.trusted_header.as_deref() else {
            return Ok(None);
        };

        let known_proxies = config
            .known_proxies
            .iter()
            .map(|text| {
                text.trim().parse::<IpAddr>().map_err(|e| {
                    PortcullisError::Config(format!("known proxy `{text}` is not an IP address: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(header, known_proxies).map(Some)
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn known_proxies(&self) -> &[IpAddr] {
        &self.known_proxies
    }

    /// Whether `peer` may set the trusted header.
    pub fn is_known_proxy(&self, peer: IpAddr) -> bool {
        self.known_proxies.is_empty() || self.known_proxies.contains(&peer)
    }

    /// Client address carried by the trusted header, if `peer` may set it.
    ///
    /// Each proxy appends the address it saw, so the right-most parseable
    /// token of the last header line is the one our own proxy wrote.
    pub fn forwarded_client(&self, headers: &HeaderMap, peer: IpAddr) -> Option<IpAddr> {
        if !self.is_known_proxy(peer) {
            debug!(%peer, header = %self.header, "ignoring trusted header from unknown peer");
            return None;
        }

        let value = headers.get_all(&self.header).iter().last()?;
        let value = value.to_str().ok()?;
        value.rsplit(',').find_map(parse_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn proxy_config(header: Option<&str>, proxies: &[&str]) -> ProxyConfig {
        ProxyConfig {
            trusted_header: header.map(str::to_string),
            known_proxies: proxies.iter().map(|p| p.to_string()).collect(),
            running_in_container: false,
        }
    }

    fn ip(text: &str) -> IpAddr {
        text.parse().unwrap()
    }

    #[test]
    fn no_header_means_no_trust() {
        let trust = ProxyTrust::from_config(&proxy_config(None, &["10.0.0.2"])).unwrap();
        assert!(trust.is_none());
    }

    #[test]
    fn container_disables_trust() {
        let mut config = proxy_config(Some("X-Original-For"), &[]);
        config.running_in_container = true;
        assert!(ProxyTrust::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn builds_trust_from_config() {
        let trust = ProxyTrust::from_config(&proxy_config(Some("X-Original-For"), &["10.0.0.2", "fd00::2"]))
            .unwrap()
            .expect("trust configured");
        assert_eq!(trust.header().as_str(), "x-original-for");
        assert_eq!(trust.known_proxies(), &[ip("10.0.0.2"), ip("fd00::2")]);
    }

    #[test]
    fn invalid_header_name_is_config_error() {
        let too_long = "x".repeat(MAX_TRUSTED_HEADER_LEN + 1);
        for header in ["X Forwarded", "", "X-Forwarded-For:", too_long.as_str()] {
            let result = ProxyTrust::from_config(&proxy_config(Some(header), &[]));
            assert!(matches!(result, Err(PortcullisError::Config(_))), "{header:?}");
        }
    }

    #[test]
    fn header_name_at_max_length_is_accepted() {
        let header = "x".repeat(MAX_TRUSTED_HEADER_LEN);
        assert!(ProxyTrust::from_config(&proxy_config(Some(&header), &[])).unwrap().is_some());
    }

    #[test]
    fn invalid_known_proxy_is_config_error() {
        let result = ProxyTrust::from_config(&proxy_config(Some("X-Original-For"), &["proxy.local"]));
        match result {
            Err(PortcullisError::Config(msg)) => assert!(msg.contains("proxy.local"), "got: {msg}"),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn forwarded_client_takes_rightmost_token() {
        let trust = ProxyTrust::new("x-original-for", vec![]).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-original-for", HeaderValue::from_static("1.1.1.1, 203.0.113.9"));
        assert_eq!(
            trust.forwarded_client(&headers, ip("10.0.0.2")),
            Some(ip("203.0.113.9"))
        );
    }

    #[test]
    fn forwarded_client_skips_trailing_garbage() {
        let trust = ProxyTrust::new("x-original-for", vec![]).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-original-for", HeaderValue::from_static("203.0.113.9, unknown"));
        assert_eq!(
            trust.forwarded_client(&headers, ip("10.0.0.2")),
            Some(ip("203.0.113.9"))
        );
    }

    #[test]
    fn forwarded_client_uses_last_header_line() {
        let trust = ProxyTrust::new("x-original-for", vec![]).unwrap();
        let mut headers = HeaderMap::new();
        headers.append("x-original-for", HeaderValue::from_static("6.6.6.6"));
        headers.append("x-original-for", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(
            trust.forwarded_client(&headers, ip("10.0.0.2")),
            Some(ip("198.51.100.4"))
        );
    }

    #[test]
    fn unknown_peer_is_not_trusted() {
        let trust = ProxyTrust::new("x-original-for", vec![ip("10.0.0.2")]).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-original-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(trust.forwarded_client(&headers, ip("10.0.0.3")), None);
        assert_eq!(
            trust.forwarded_client(&headers, ip("10.0.0.2")),
            Some(ip("203.0.113.9"))
        );
    }

    #[test]
    fn missing_header_yields_none() {
        let trust = ProxyTrust::new("x-original-for", vec![]).unwrap();
        assert_eq!(trust.forwarded_client(&HeaderMap::new(), ip("10.0.0.2")), None);
    }

    #[test]
    fn resolver_follows_trust() {
        use crate::client_ip::ClientIpResolver;

        let trust = ProxyTrust::new("x-original-for", vec![]).unwrap();
        assert!(ClientIpResolver::from_trust(Some(&trust)).trusted_header_configured());
        assert!(!ClientIpResolver::from_trust(None).trusted_header_configured());
    }
}
