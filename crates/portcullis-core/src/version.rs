// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Version string formatting.

use semver::Version;

/// Format a version for display as `major.minor.patch[-pre]`.
///
/// Build metadata is dropped so that `1.2.3+git.abc` and `1.2.3` read the same
/// in logs and headers.
pub fn format_version(version: &Version) -> String {
    let mut out = format!("{}.{}.{}", version.major, version.minor, version.patch);
    if !version.pre.is_empty() {
        out.push('-');
        out.push_str(version.pre.as_str());
    }
    out
}

/// The version of the Portcullis crates, taken from the workspace manifest.
pub fn package_version() -> Version {
    // CARGO_PKG_VERSION is always valid semver; fall back to 0.0.0 rather than panic.
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// `"<name> v<version>"`, used in startup logs and `portcullis version`.
pub fn version_string(name: &str) -> String {
    format!("{name} v{}", format_version(&package_version()))
}
