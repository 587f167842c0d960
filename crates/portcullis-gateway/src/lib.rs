// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! axum integration for the Portcullis security helpers.
//!
//! Two middleware layers normalize the remote address behind a trusted proxy
//! and attach the resolved client address to each request; [`safe_redirect`]
//! turns a caller-supplied target into a redirect that cannot leave the site
//! for a private host. [`router`] wires them into a small demo server.

pub mod middleware;
pub mod redirect;
pub mod server;

pub use middleware::{client_ip_middleware, forwarded_headers_middleware, ClientIp, RemoteAddr};
pub use redirect::safe_redirect;
pub use server::{router, start_server, GatewayState};
