// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redirect target sterilization.
//!
//! A redirect target taken from a query parameter or form field is either
//! returned untouched or replaced by [`UNSAFE_LINK`]. Accepted targets are
//! same-site paths (`/account`, never `//host` or `/\host`) and absolute
//! `http`/`https` URLs whose host is neither loopback nor a private IPv4
//! literal. Public hosts are allowed through: this is not a same-origin check.

use std::fmt;
use std::net::IpAddr;

use tracing::debug;
use url::{Host, Url};

use crate::ip::{self, PrivateRanges};

/// Sentinel returned for any target that must not be followed.
pub const UNSAFE_LINK: &str = "#";

/// Why a redirect target was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing, empty or whitespace-only input.
    Empty,
    /// Not an absolute http(s) URL and not a single-slash local path.
    NotLocalPath,
    /// Absolute URL pointing at the local host.
    Loopback,
    /// Absolute URL whose host is a private IPv4 literal.
    PrivateAddress,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Empty => "empty target",
            Rejection::NotLocalPath => "not an http(s) URL or local path",
            Rejection::Loopback => "loopback host",
            Rejection::PrivateAddress => "private address",
        };
        f.write_str(reason)
    }
}

/// Shape of an accepted target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Same-site path such as `/orders?page=2`.
    LocalPath,
    /// Absolute http(s) URL on a public host.
    Absolute,
}

/// Sterilize an optional redirect target.
///
/// Returns the input unchanged when it is safe to follow, [`UNSAFE_LINK`]
/// otherwise. Never fails.
pub fn sterilize(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => sterilize_str(raw),
        None => UNSAFE_LINK.to_string(),
    }
}

/// [`sterilize`] for a present value.
pub fn sterilize_str(raw: &str) -> String {
    match check_link(raw) {
        Ok(_) => raw.to_string(),
        Err(reason) => {
            debug!(%reason, len = raw.len(), "redirect target rejected");
            UNSAFE_LINK.to_string()
        }
    }
}

/// Classify a redirect target without rewriting it.
pub fn check_link(raw: &str) -> Result<LinkKind, Rejection> {
    if raw.trim().is_empty() {
        return Err(Rejection::Empty);
    }

    let Some(url) = parse_http_url(raw) else {
        return if is_local_path(raw) {
            Ok(LinkKind::LocalPath)
        } else {
            Err(Rejection::NotLocalPath)
        };
    };

    match url.host() {
        Some(Host::Domain(domain)) if is_localhost_name(domain) => Err(Rejection::Loopback),
        Some(Host::Ipv4(v4)) if v4.is_loopback() => Err(Rejection::Loopback),
        Some(Host::Ipv6(v6)) if ip::is_loopback(&IpAddr::V6(v6)) => Err(Rejection::Loopback),
        Some(Host::Ipv4(v4)) if ip::is_private_v4(&v4, PrivateRanges::Redirect) => {
            Err(Rejection::PrivateAddress)
        }
        Some(Host::Ipv6(v6))
            if v6
                .to_ipv4_mapped()
                .is_some_and(|v4| ip::is_private_v4(&v4, PrivateRanges::Redirect)) =>
        {
            Err(Rejection::PrivateAddress)
        }
        _ => Ok(LinkKind::Absolute),
    }
}

/// Parse `raw` as an absolute URL restricted to the http and https schemes.
fn parse_http_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

/// `/` alone, or `/` followed by anything but a second `/` or a `\`.
fn is_local_path(raw: &str) -> bool {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some('/'), None) => true,
        (Some('/'), Some(next)) => next != '/' && next != '\\',
        _ => false,
    }
}

fn is_localhost_name(domain: &str) -> bool {
    domain
        .strip_suffix('.')
        .unwrap_or(domain)
        .eq_ignore_ascii_case("localhost")
}
