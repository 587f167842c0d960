// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Portcullis.

use std::net::AddrParseError;

use thiserror::Error;

/// The primary error type used across the Portcullis crates.
///
/// Untrusted request data never surfaces as one of these: unsafe redirect
/// targets collapse to a sentinel and malformed proxy headers are skipped.
/// Errors are reserved for caller contract violations and setup failures.
#[derive(Debug, Error)]
pub enum PortcullisError {
    /// Text passed where an IP literal is required did not parse.
    #[error("invalid IP address `{input}`: {source}")]
    InvalidIp {
        input: String,
        source: AddrParseError,
    },

    /// Configuration values that cannot be turned into a runtime value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Password hashing or verification failures (bad PHC string, bad parameters).
    #[error("password error: {0}")]
    Password(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortcullisError {
    /// Build an [`PortcullisError::InvalidIp`] from the offending input.
    pub fn invalid_ip(input: &str, source: AddrParseError) -> Self {
        Self::InvalidIp {
            input: input.to_string(),
            source,
        }
    }
}
