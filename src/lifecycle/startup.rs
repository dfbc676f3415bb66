//! Startup reporting.

use std::net::SocketAddr;

use crate::config::ProxyConfig;

/// Log the listen address, the supported route shapes and the CORS and
/// forwarding settings.
pub fn log_startup(config: &ProxyConfig, local_addr: SocketAddr) {
    tracing::info!(address = %local_addr, "Starting CORS proxy server");
    tracing::info!("CORS proxy supports:");
    tracing::info!("  - http://{local_addr}/proxy/{{target-url}}");
    tracing::info!("  - http://{local_addr}/proxy/?target={{target-url}}");
    tracing::info!("  - http://{local_addr}/getconfig/{{filename}}");
    tracing::info!(
        allow_origin = %config.cors.allow_origin,
        trust_proxy = config.forwarding.trust_proxy,
        verbose = config.observability.verbose,
        connect_timeout_secs = config.timeouts.connect_secs,
        response_timeout_secs = config.timeouts.response_secs,
        "Configuration loaded"
    );
}
