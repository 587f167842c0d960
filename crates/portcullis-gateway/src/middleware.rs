// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request middleware for remote-address normalization and client-IP resolution.
//!
//! Layer order matters: [`forwarded_headers_middleware`] must run before
//! [`client_ip_middleware`] so the resolver sees the normalized address.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::server::GatewayState;

/// Remote address of the request after trusted-proxy normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub IpAddr);

/// Resolved client address. `None` when the request has no connection info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

fn peer_addr(request: &Request) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Record the request's [`RemoteAddr`], rewritten from the trusted proxy
/// header when one is configured and the peer is a known proxy.
pub async fn forwarded_headers_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(peer) = peer_addr(&request) else {
        return next.run(request).await;
    };

    let remote = match state.trust.as_deref() {
        Some(trust) => match trust.forwarded_client(request.headers(), peer) {
            Some(forwarded) => {
                tracing::debug!(%peer, remote = %forwarded, header = %trust.header(), "remote address taken from trusted header");
                forwarded
            }
            None => peer,
        },
        None => peer,
    };

    request.extensions_mut().insert(RemoteAddr(remote));
    next.run(request).await
}

/// Resolve the client address and attach it as a [`ClientIp`] extension.
pub async fn client_ip_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let remote = request
        .extensions()
        .get::<RemoteAddr>()
        .map(|RemoteAddr(ip)| *ip)
        .or_else(|| peer_addr(&request));

    let client_ip = state.resolver.resolve(request.headers(), remote);
    request.extensions_mut().insert(ClientIp(client_ip));
    next.run(request).await
}
