// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, Request},
    middleware as axum_middleware,
    response::Redirect,
    routing::get,
    Json, Router,
};
use portcullis_config::PortcullisConfig;
use portcullis_core::PortcullisError;
use portcullis_security::{ClientIpResolver, ProxyTrust};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{client_ip_middleware, forwarded_headers_middleware, ClientIp, RemoteAddr};
use crate::redirect::safe_redirect;

/// Shared state for the middleware and handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Trusted proxy context, `None` when proxy trust is disabled.
    pub trust: Option<Arc<ProxyTrust>>,
    /// Resolver configured to match `trust`.
    pub resolver: Arc<ClientIpResolver>,
}

impl GatewayState {
    pub fn new(trust: Option<ProxyTrust>) -> Self {
        let resolver = ClientIpResolver::from_trust(trust.as_ref());
        Self {
            trust: trust.map(Arc::new),
            resolver: Arc::new(resolver),
        }
    }

    /// Build state from the `[proxy]` section of a loaded configuration.
    pub fn from_config(config: &PortcullisConfig) -> Result<Self, PortcullisError> {
        ProxyTrust::from_config(&config.proxy).map(Self::new)
    }
}

/// Body of `GET /whoami`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhoAmI {
    pub client_ip: Option<String>,
    pub remote_addr: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedirectParams {
    pub to: Option<String>,
}

async fn whoami(request: Request) -> Json<WhoAmI> {
    let extensions = request.extensions();
    Json(WhoAmI {
        client_ip: extensions.get::<ClientIp>().and_then(|ClientIp(ip)| ip.clone()),
        remote_addr: extensions.get::<RemoteAddr>().map(|RemoteAddr(ip)| ip.to_string()),
    })
}

async fn redirect(Query(params): Query<RedirectParams>) -> Redirect {
    safe_redirect(params.to.as_deref())
}

/// Build the router:
/// - GET /whoami: the resolved client address as JSON
/// - GET /redirect?to=: a sterilized redirect
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/redirect", get(redirect))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    forwarded_headers_middleware,
                ))
                .layer(axum_middleware::from_fn_with_state(
                    state,
                    client_ip_middleware,
                )),
        )
}

/// Bind `bind_address` and serve [`router`] until Ctrl-C.
pub async fn start_server(bind_address: &str, state: GatewayState) -> Result<(), PortcullisError> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| PortcullisError::Internal(format!("failed to bind gateway to {bind_address}: {e}")))?;

    tracing::info!(
        address = bind_address,
        trusted_header = state.trust.as_ref().map(|t| t.header().as_str()),
        "gateway listening"
    );

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| PortcullisError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
