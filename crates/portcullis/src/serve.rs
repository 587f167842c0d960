// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `portcullis serve` command implementation.

use portcullis_config::PortcullisConfig;
use portcullis_core::PortcullisError;
use portcullis_gateway::{start_server, GatewayState};
use tracing::info;

/// Run the demo gateway until interrupted.
///
/// `bind` overrides `[gateway] bind_address`.
pub async fn run_serve(config: &PortcullisConfig, bind: Option<&str>) -> Result<(), PortcullisError> {
    let state = GatewayState::from_config(config)?;
    let bind_address = bind.unwrap_or(&config.gateway.bind_address);

    info!(
        version = %portcullis_core::package_version(),
        running_in_container = config.proxy.running_in_container,
        "starting portcullis gateway"
    );

    start_server(bind_address, state).await
}
