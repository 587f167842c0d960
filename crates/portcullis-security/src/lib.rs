// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-facing security helpers.
//!
//! - [`ip`]: private/public classification for IPv4 and IPv6 addresses.
//! - [`sterilize`]: open-redirect defense for caller-supplied redirect targets.
//! - [`client_ip`]: client address resolution across proxy headers.
//! - [`proxy`]: trusted-proxy context built from configuration.
//! - [`password`]: salted Argon2id password hashing.
//!
//! Everything here is synchronous and free of shared mutable state.

pub mod client_ip;
pub mod ip;
pub mod password;
pub mod proxy;
pub mod sterilize;

pub use client_ip::{ClientIpResolver, CLIENT_IP_HEADERS};
pub use ip::{is_private, is_private_addr, is_private_with, PrivateRanges};
pub use password::{hash_password, needs_rehash, verify_password, PasswordParams};
pub use proxy::ProxyTrust;
pub use sterilize::{sterilize, sterilize_str, UNSAFE_LINK};
