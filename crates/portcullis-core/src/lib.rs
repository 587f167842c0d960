// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Portcullis.
//!
//! Holds the shared error type and the small pieces of plumbing every other
//! crate in the workspace leans on: environment flag parsing, version string
//! formatting and plain validation predicates.

pub mod env;
pub mod error;
pub mod validate;
pub mod version;

// Re-export key items at crate root for ergonomic imports.
pub use error::PortcullisError;
pub use version::{format_version, package_version, version_string};
