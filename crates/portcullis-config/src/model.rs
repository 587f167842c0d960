// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Portcullis.
//!
//! Every section rejects unknown keys, so a typo fails at startup with a
//! suggestion instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Maximum length of a custom trusted header name.
pub const MAX_TRUSTED_HEADER_LEN: usize = 40;

/// Contents of `portcullis.toml`. Every section may be omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortcullisConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Reverse proxy trust settings.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Password hashing cost parameters.
    #[serde(default)]
    pub password: PasswordConfig,

    /// Demo gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Reverse proxy trust configuration.
///
/// When `trusted_header` is set (and the process is not running in a
/// container), an upstream layer normalizes the remote address from that
/// header and client-IP resolution stops consulting the generic proxy headers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Custom header carrying the client address, set by a trusted proxy.
    /// Must be an HTTP token of at most 40 characters.
    #[serde(default)]
    pub trusted_header: Option<String>,

    /// Addresses of proxies allowed to set `trusted_header`. Empty trusts any peer.
    #[serde(default)]
    pub known_proxies: Vec<String>,

    /// Running inside a container disables proxy trust entirely.
    #[serde(default)]
    pub running_in_container: bool,
}

/// Argon2id cost parameters for password hashing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_cost")]
    pub memory_cost: u32,

    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: default_memory_cost(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory_cost() -> u32 {
    65536 // 64 MiB
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    1
}

/// Demo gateway server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Socket address the `serve` command binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}
