// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable flags.
//!
//! Boolean switches read from the process environment. Anything unset or
//! unparsable reads as `false`.

/// Primary variable signalling that the process runs inside a container.
pub const RUNNING_IN_CONTAINER_ENV_VAR: &str = "PORTCULLIS_RUNNING_IN_CONTAINER";

/// Conventional variable set by many container base images.
pub const GENERIC_CONTAINER_ENV_VAR: &str = "RUNNING_IN_CONTAINER";

/// Parse a boolean flag value.
///
/// Accepts `1/0`, `true/false`, `yes/no` and `on/off`, case-insensitively and
/// ignoring surrounding whitespace. Returns `None` for anything else.
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
pub fn env_flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => parse_bool_flag(&value).unwrap_or_else(|| {
            tracing::warn!(var = name, value = %value, "ignoring unparsable boolean env var");
            false
        }),
        Err(_) => false,
    }
}

/// Whether the process reports running inside a container.
///
/// Checks [`RUNNING_IN_CONTAINER_ENV_VAR`] first, then [`GENERIC_CONTAINER_ENV_VAR`].
pub fn running_in_container() -> bool {
    env_flag(RUNNING_IN_CONTAINER_ENV_VAR) || env_flag(GENERIC_CONTAINER_ENV_VAR)
}
