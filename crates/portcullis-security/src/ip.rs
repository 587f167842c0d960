// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Private/public IP address classification.
//!
//! Two rule sets exist and are kept apart on purpose: redirect targets are
//! checked against the RFC 1918 blocks plus loopback only, while client
//! addresses taken from proxy headers additionally exclude link-local,
//! "this network" and the reserved IPv6 scopes. Folding them together would
//! change which `169.254.x.x` and `0.x.x.x` redirect targets are accepted.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use portcullis_core::PortcullisError;

/// Which set of ranges counts as private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrivateRanges {
    /// `10/8`, `127/8`, `172.16/12`, `192.168/16`. No IPv6 rules.
    #[default]
    Redirect,
    /// The redirect ranges plus `169.254/16` and `0/8`, and the IPv6 scopes
    /// link-local, site-local, multicast, loopback and unspecified.
    ClientIp,
}

/// Parse an IP literal, failing on anything else (including empty input).
pub fn parse_ip(ip_text: &str) -> Result<IpAddr, PortcullisError> {
    ip_text
        .parse::<IpAddr>()
        .map_err(|e| PortcullisError::invalid_ip(ip_text, e))
}

/// Classify an IP literal under the redirect rule set.
///
/// Fails with [`PortcullisError::InvalidIp`] when `ip_text` is not an IP
/// literal; an unparsable address is a caller error, not "public".
pub fn is_private(ip_text: &str) -> Result<bool, PortcullisError> {
    is_private_with(ip_text, PrivateRanges::Redirect)
}

/// Classify an IP literal under the given rule set.
pub fn is_private_with(ip_text: &str, ranges: PrivateRanges) -> Result<bool, PortcullisError> {
    parse_ip(ip_text).map(|ip| is_private_addr(&ip, ranges))
}

/// Classify a parsed address under the given rule set.
pub fn is_private_addr(ip: &IpAddr, ranges: PrivateRanges) -> bool {
    match (ip, ranges) {
        (IpAddr::V4(v4), _) => is_private_v4(v4, ranges),
        (IpAddr::V6(_), PrivateRanges::Redirect) => false,
        (IpAddr::V6(v6), PrivateRanges::ClientIp) => match v6.to_ipv4_mapped() {
            Some(v4) => is_private_v4(&v4, PrivateRanges::ClientIp),
            None => is_private_v6(v6),
        },
    }
}

/// IPv4 classification by the first two octets.
pub fn is_private_v4(ip: &Ipv4Addr, ranges: PrivateRanges) -> bool {
    let [a, b, _, _] = ip.octets();
    let common = a == 10 || a == 127 || (a == 172 && (16..=31).contains(&b)) || (a == 192 && b == 168);
    match ranges {
        PrivateRanges::Redirect => common,
        PrivateRanges::ClientIp => common || (a == 169 && b == 254) || a == 0,
    }
}

/// IPv6 classification (client-IP rules).
pub fn is_private_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        || (first & 0xffc0) == 0xfe80 // fe80::/10 link-local
        || (first & 0xffc0) == 0xfec0 // fec0::/10 site-local
}

/// `true` for an address a proxy header may legitimately name as the client.
pub fn is_public_client_ip(ip: &IpAddr) -> bool {
    !is_private_addr(ip, PrivateRanges::ClientIp)
}

/// Loopback check covering `127/8`, `::1` and IPv4-mapped loopback.
pub fn is_loopback(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    // --- IPv4, shared ranges ---

    #[test]
    fn rfc1918_class_a_is_private_in_both_sets() {
        for ranges in [PrivateRanges::Redirect, PrivateRanges::ClientIp] {
            assert!(is_private_addr(&v4(10, 0, 0, 1), ranges));
            assert!(is_private_addr(&v4(10, 255, 255, 255), ranges));
        }
    }

    #[test]
    fn rfc1918_class_b_boundaries() {
        for ranges in [PrivateRanges::Redirect, PrivateRanges::ClientIp] {
            assert!(!is_private_addr(&v4(172, 15, 255, 255), ranges));
            assert!(is_private_addr(&v4(172, 16, 0, 0), ranges));
            assert!(is_private_addr(&v4(172, 31, 255, 255), ranges));
            assert!(!is_private_addr(&v4(172, 32, 0, 0), ranges));
        }
    }

    #[test]
    fn rfc1918_class_c_is_private() {
        for ranges in [PrivateRanges::Redirect, PrivateRanges::ClientIp] {
            assert!(is_private_addr(&v4(192, 168, 1, 1), ranges));
            assert!(!is_private_addr(&v4(192, 169, 1, 1), ranges));
        }
    }

    #[test]
    fn loopback_v4_is_private() {
        for ranges in [PrivateRanges::Redirect, PrivateRanges::ClientIp] {
            assert!(is_private_addr(&v4(127, 0, 0, 1), ranges));
            assert!(is_private_addr(&v4(127, 255, 255, 254), ranges));
        }
    }

    // --- IPv4, rule sets diverge ---

    // The redirect set deliberately leaves 169.254/16 and 0/8 public.
    #[test]
    fn link_local_v4_only_private_for_client_ip() {
        let ip = v4(169, 254, 169, 254);
        assert!(!is_private_addr(&ip, PrivateRanges::Redirect));
        assert!(is_private_addr(&ip, PrivateRanges::ClientIp));
    }

    #[test]
    fn this_network_only_private_for_client_ip() {
        let ip = v4(0, 0, 0, 0);
        assert!(!is_private_addr(&ip, PrivateRanges::Redirect));
        assert!(is_private_addr(&ip, PrivateRanges::ClientIp));
        assert!(is_private_addr(&v4(0, 1, 2, 3), PrivateRanges::ClientIp));
    }

    #[test]
    fn public_v4_is_public() {
        for ip in [v4(8, 8, 8, 8), v4(1, 1, 1, 1), v4(104, 18, 0, 1), v4(255, 255, 255, 255)] {
            assert!(!is_private_addr(&ip, PrivateRanges::Redirect), "{ip}");
            assert!(!is_private_addr(&ip, PrivateRanges::ClientIp), "{ip}");
        }
    }

    // --- IPv6 ---

    #[test]
    fn ipv6_reserved_scopes_are_private_for_client_ip() {
        for text in ["::1", "::", "fe80::1", "febf::1", "fec0::1", "feff::1", "ff02::1", "ff0e::1"] {
            let ip: IpAddr = text.parse().unwrap();
            assert!(is_private_addr(&ip, PrivateRanges::ClientIp), "{text}");
        }
    }

    #[test]
    fn ipv6_global_is_public_for_client_ip() {
        for text in ["2001:4860:4860::8888", "2606:4700:4700::1111", "fd00::1", "fc00::1"] {
            let ip: IpAddr = text.parse().unwrap();
            assert!(!is_private_addr(&ip, PrivateRanges::ClientIp), "{text}");
        }
    }

    #[test]
    fn ipv4_mapped_v6_uses_embedded_address() {
        let mapped: IpAddr = "::ffff:10.0.0.1".parse().unwrap();
        assert!(is_private_addr(&mapped, PrivateRanges::ClientIp));

        let mapped_public: IpAddr = "::ffff:8.8.8.8".parse().unwrap();
        assert!(!is_private_addr(&mapped_public, PrivateRanges::ClientIp));
    }

    #[test]
    fn redirect_set_has_no_ipv6_rules() {
        let ip: IpAddr = "fe80::1".parse().unwrap();
        assert!(!is_private_addr(&ip, PrivateRanges::Redirect));
    }

    // --- Text entry points ---

    #[test]
    fn is_private_parses_text() {
        assert!(is_private("10.1.2.3").unwrap());
        assert!(!is_private("93.184.216.34").unwrap());
        assert!(is_private_with("169.254.0.1", PrivateRanges::ClientIp).unwrap());
        assert!(!is_private("169.254.0.1").unwrap());
    }

    #[test]
    fn is_private_rejects_non_ip_text() {
        assert!(matches!(
            is_private("not-an-ip"),
            Err(PortcullisError::InvalidIp { .. })
        ));
    }

    #[test]
    fn is_private_rejects_empty_text() {
        assert!(matches!(is_private(""), Err(PortcullisError::InvalidIp { .. })));
        assert!(is_private_with(" ", PrivateRanges::ClientIp).is_err());
    }

    #[test]
    fn is_private_rejects_address_with_port() {
        assert!(is_private("10.0.0.1:80").is_err());
    }

    #[test]
    fn loopback_detection() {
        assert!(is_loopback(&v4(127, 0, 0, 1)));
        assert!(is_loopback(&v4(127, 9, 9, 9)));
        assert!(is_loopback(&"::1".parse().unwrap()));
        assert!(is_loopback(&"::ffff:127.0.0.1".parse().unwrap()));
        assert!(!is_loopback(&v4(10, 0, 0, 1)));
    }

    #[test]
    fn public_client_ip_helper() {
        assert!(is_public_client_ip(&v4(8, 8, 8, 8)));
        assert!(!is_public_client_ip(&v4(169, 254, 1, 1)));
    }
}
