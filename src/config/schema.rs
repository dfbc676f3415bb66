//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive `Deserialize` for loading from config files.

use serde::Deserialize;

/// Root configuration for the CORS proxy.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (address, port).
    pub listener: ListenerConfig,

    /// CORS response header settings.
    pub cors: CorsConfig,

    /// Outbound request settings.
    pub forwarding: ForwardingConfig,

    /// Timeout configuration for upstream calls.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to listen on (e.g., "127.0.0.1", "0.0.0.0", "::1").
    pub address: String,

    /// Port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// Address and port joined into a bindable `host:port` string.
    ///
    /// Bare IPv6 addresses are bracketed.
    pub fn bind_address(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CorsConfig {
    /// Value for `Access-Control-Allow-Origin`: a literal origin or `*`.
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
        }
    }
}

/// Outbound request configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Believe `X-Forwarded-For` / `X-Real-IP` from the caller when deriving
    /// the client address. Only enable behind a reverse proxy you control.
    pub trust_proxy: bool,
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the upstream to send response headers, in seconds.
    pub response_secs: u64,

    /// Idle pooled connection lifetime in seconds.
    pub pool_idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            response_secs: 60,
            pool_idle_secs: 90,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable debug-level logging of every forwarding step.
    pub verbose: bool,
}
