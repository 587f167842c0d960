// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline inspection commands: `sterilize`, `classify`, `resolve`, `check-config`.

use std::net::IpAddr;

use http::{HeaderMap, HeaderName, HeaderValue};
use portcullis_config::PortcullisConfig;
use portcullis_core::PortcullisError;
use portcullis_security::ip::parse_ip;
use portcullis_security::{is_private_with, sterilize, ClientIpResolver, PrivateRanges, ProxyTrust};

/// clap value parser for `-H 'Name: value'`.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    let name = name.trim();
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| format!("invalid header name `{name}`: {e}"))?;
    let value = value.trim();
    HeaderValue::from_str(value).map_err(|e| format!("invalid header value for `{name}`: {e}"))?;
    Ok((name.to_string(), value.to_string()))
}

pub fn sterilize_target(target: &str) -> String {
    sterilize(Some(target))
}

pub fn classify(ip: &str, client: bool) -> Result<&'static str, PortcullisError> {
    let ranges = if client {
        PrivateRanges::ClientIp
    } else {
        PrivateRanges::Redirect
    };
    Ok(if is_private_with(ip, ranges)? {
        "private"
    } else {
        "public"
    })
}

/// Resolve the client address the gateway would see, honoring `[proxy]`.
pub fn resolve(
    config: &PortcullisConfig,
    remote: Option<&str>,
    headers: &[(String, String)],
) -> Result<String, PortcullisError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| PortcullisError::Internal(format!("invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| PortcullisError::Internal(format!("invalid header value: {e}")))?;
        map.append(name, value);
    }

    let peer: Option<IpAddr> = remote.map(parse_ip).transpose()?;
    let trust = ProxyTrust::from_config(&config.proxy)?;
    let remote = match (trust.as_ref(), peer) {
        (Some(trust), Some(peer)) => Some(trust.forwarded_client(&map, peer).unwrap_or(peer)),
        (_, peer) => peer,
    };

    let resolver = ClientIpResolver::from_trust(trust.as_ref());
    Ok(resolver
        .resolve(&map, remote)
        .unwrap_or_else(|| "unknown".to_string()))
}

/// Summarize a configuration that already passed validation, building the
/// runtime values it describes so their errors surface here too.
pub fn check_config(config: &PortcullisConfig) -> Result<String, PortcullisError> {
    let trust = match ProxyTrust::from_config(&config.proxy)? {
        Some(trust) => format!(
            "trusted header {} ({} known proxies)",
            trust.header(),
            trust.known_proxies().len()
        ),
        None => "proxy trust disabled".to_string(),
    };
    Ok(format!(
        "configuration OK: log level {}, {trust}, argon2id m={} t={} p={}, bind {}",
        config.logging.level,
        config.password.memory_cost,
        config.password.iterations,
        config.password.parallelism,
        config.gateway.bind_address,
    ))
}
