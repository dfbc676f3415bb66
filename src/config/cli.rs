//! Command-line flags.
//!
//! Flags that are given explicitly override the config file, which in turn
//! overrides the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::ProxyConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "argon-proxy", version)]
#[command(about = "CORS proxy that relays browser requests to third-party APIs", long_about = None)]
pub struct Cli {
    /// Port to listen on [default: 8080]
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to listen on [default: 127.0.0.1]
    #[arg(long)]
    pub address: Option<String>,

    /// CORS Allow-Origin header value [default: *]
    #[arg(long = "allow-origin")]
    pub allow_origin: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Trust X-Forwarded-* headers from a fronting reverse proxy
    #[arg(long = "trust-proxy")]
    pub trust_proxy: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the embedded sample configuration names and exit
    #[arg(long = "list-configs")]
    pub list_configs: bool,
}

impl Cli {
    /// Build the final, validated configuration.
    pub fn resolve(&self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };
        self.apply_overrides(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(address) = &self.address {
            config.listener.address = address.clone();
        }
        if let Some(origin) = &self.allow_origin {
            config.cors.allow_origin = origin.clone();
        }
        if self.verbose {
            config.observability.verbose = true;
        }
        if self.trust_proxy {
            config.forwarding.trust_proxy = true;
        }
    }
}
