// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./portcullis.toml` > `~/.config/portcullis/portcullis.toml`
//! > `/etc/portcullis/portcullis.toml`, with environment variable overrides via
//! the `PORTCULLIS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PortcullisConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/portcullis/portcullis.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "portcullis.toml";

/// `~/.config/portcullis/portcullis.toml`, when a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("portcullis/portcullis.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/portcullis/portcullis.toml` (system-wide)
/// 3. `~/.config/portcullis/portcullis.toml` (user XDG config)
/// 4. `./portcullis.toml` (local directory)
/// 5. `PORTCULLIS_*` environment variables
pub fn load_config() -> Result<PortcullisConfig, figment::Error> {
    build_figment().extract().map(apply_container_flag)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PortcullisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PortcullisConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PortcullisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PortcullisConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
        .map(apply_container_flag)
}

/// A container flag in the environment wins over `[proxy] running_in_container = false`.
fn apply_container_flag(mut config: PortcullisConfig) -> PortcullisConfig {
    if portcullis_core::env::running_in_container() {
        config.proxy.running_in_container = true;
    }
    config
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PortcullisConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_FILE))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `PORTCULLIS_PROXY_TRUSTED_HEADER`
/// must become `proxy.trusted_header`, not `proxy.trusted.header`.
/// `PORTCULLIS_RUNNING_IN_CONTAINER` is a process flag, not a config key.
fn env_provider() -> Env {
    Env::prefixed("PORTCULLIS_")
        .filter(|key| !key.as_str().eq_ignore_ascii_case("running_in_container"))
        .map(|key| {
            // Env lowercases keys only after this closure runs.
            let mapped = key
                .as_str()
                .to_ascii_lowercase()
                .replacen("logging_", "logging.", 1)
                .replacen("proxy_", "proxy.", 1)
                .replacen("password_", "password.", 1)
                .replacen("gateway_", "gateway.", 1);
            mapped.into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("portcullis.toml", "[proxy]\nknown_proxies = [\"10.0.0.2\"]\n")?;
            jail.set_env("PORTCULLIS_PROXY_TRUSTED_HEADER", "X-Original-For");
            jail.set_env("PORTCULLIS_LOGGING_LEVEL", "debug");

            let config = load_config_from_path(Path::new("portcullis.toml"))?;
            assert_eq!(config.proxy.trusted_header.as_deref(), Some("X-Original-For"));
            assert_eq!(config.proxy.known_proxies, vec!["10.0.0.2".to_string()]);
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn env_sets_container_flag() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORTCULLIS_PROXY_RUNNING_IN_CONTAINER", "true");
            let config = build_figment().extract::<PortcullisConfig>()?;
            assert!(config.proxy.running_in_container);
            Ok(())
        });
    }

    #[test]
    fn process_container_flag_is_not_a_config_key() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("portcullis.toml", "[proxy]\nrunning_in_container = false\n")?;
            jail.set_env("PORTCULLIS_RUNNING_IN_CONTAINER", "1");
            let config = load_config_from_path(Path::new("portcullis.toml"))?;
            assert!(config.proxy.running_in_container);
            Ok(())
        });
    }

    #[test]
    fn uppercase_env_keys_reach_every_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORTCULLIS_PASSWORD_MEMORY_COST", "19456");
            jail.set_env("PORTCULLIS_GATEWAY_BIND_ADDRESS", "0.0.0.0:9000");
            let config = load_config()?;
            assert_eq!(config.password.memory_cost, 19456);
            assert_eq!(config.gateway.bind_address, "0.0.0.0:9000");
            Ok(())
        });
    }
}
