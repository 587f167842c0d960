// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Portcullis.
//!
//! `portcullis.toml` is looked up in `/etc/portcullis`, the user config
//! directory and the working directory, then `PORTCULLIS_*` environment
//! variables are applied on top. Unknown keys are rejected and every failure
//! becomes a [`ConfigError`] that renders as a miette diagnostic.
//!
//! ```no_run
//! let config = match portcullis_config::load_and_validate() {
//!     Ok(config) => config,
//!     Err(errors) => {
//!         portcullis_config::render_errors(&errors);
//!         std::process::exit(1);
//!     }
//! };
//! println!("trusted header: {:?}", config.proxy.trusted_header);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PortcullisConfig;

/// Load from the standard locations plus environment, then validate.
pub fn load_and_validate() -> Result<PortcullisConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || read_sources(&standard_paths()))
}

/// Load from `path` plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<PortcullisConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_sources(&[path.to_path_buf()])
    })
}

/// Load from a TOML string alone, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<PortcullisConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate an extracted config, or turn the extraction error into diagnostics.
///
/// `sources` is only read on failure, to attach spans to unknown keys.
fn checked(
    extracted: Result<PortcullisConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PortcullisConfig, Vec<ConfigError>> {
    let config = extracted.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Config files in the order Figment blames them, most specific first.
fn standard_paths() -> Vec<PathBuf> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG_FILE));

    [Some(local), loader::user_config_path(), Some(PathBuf::from(loader::SYSTEM_CONFIG_FILE))]
        .into_iter()
        .flatten()
        .collect()
}

/// `(display path, content)` for each readable file.
fn read_sources(paths: &[PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            std::fs::read_to_string(path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
