// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after a config deserializes: header name syntax,
//! proxy address lists, hashing cost floors and the bind address.

use portcullis_core::validate::{is_not_blank, is_valid_header_name};

use crate::diagnostic::ConfigError;
use crate::model::{PortcullisConfig, MAX_TRUSTED_HEADER_LEN};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check every rule and report all violations at once.
pub fn validate_config(config: &PortcullisConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(header) = &config.proxy.trusted_header
        && !is_valid_header_name(header, MAX_TRUSTED_HEADER_LEN)
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "proxy.trusted_header `{header}` must be 1-{MAX_TRUSTED_HEADER_LEN} HTTP token characters"
            ),
        });
    }

    for (i, proxy) in config.proxy.known_proxies.iter().enumerate() {
        if proxy.trim().parse::<std::net::IpAddr>().is_err() {
            errors.push(ConfigError::Validation {
                message: format!("proxy.known_proxies[{i}] `{proxy}` is not a valid IP address"),
            });
        }
    }

    if config.password.memory_cost < 8192 {
        errors.push(ConfigError::Validation {
            message: format!(
                "password.memory_cost must be at least 8192 (8 MiB), got {}",
                config.password.memory_cost
            ),
        });
    }

    if config.password.iterations < 1 {
        errors.push(ConfigError::Validation {
            message: "password.iterations must be at least 1, got 0".to_string(),
        });
    }

    if config.password.parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: "password.parallelism must be at least 1, got 0".to_string(),
        });
    }

    if !is_not_blank(&config.gateway.bind_address) {
        errors.push(ConfigError::Validation {
            message: "gateway.bind_address must not be empty".to_string(),
        });
    } else if config
        .gateway
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.bind_address `{}` is not a valid socket address",
                config.gateway.bind_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
