//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS)
//! - Build the shared upstream client
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::getconfig::{get_sample, list_samples};
use crate::http::middleware::cors::{cors_middleware, CorsPolicy};
use crate::http::request::UuidRequestId;
use crate::http::usage::{not_found, root_handler};
use crate::proxy::forward::proxy_handler;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cors: Arc<CorsPolicy>,
    pub client: reqwest::Client,
    pub trust_proxy: bool,
    pub response_timeout: Duration,
}

/// Error building the server from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid allow-origin value: {0}")]
    InvalidAllowOrigin(#[from] axum::http::header::InvalidHeaderValue),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP server for the CORS proxy.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let cors = Arc::new(CorsPolicy::new(&config.cors.allow_origin)?);

        // One pooled client for every upstream.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .pool_idle_timeout(Duration::from_secs(config.timeouts.pool_idle_secs))
            .build()?;

        let state = AppState {
            cors,
            client,
            trust_proxy: config.forwarding.trust_proxy,
            response_timeout: Duration::from_secs(config.timeouts.response_secs),
        };

        let router = Self::build_router(state.clone());
        Ok(Self {
            router,
            state,
            config: Arc::new(config),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(root_handler))
            .route("/proxy", any(proxy_handler))
            .route("/proxy/", any(proxy_handler))
            .route("/proxy/{*target}", any(proxy_handler))
            .route("/getconfig", get(list_samples))
            .route("/getconfig/", get(list_samples))
            .route("/getconfig/{*name}", get(get_sample))
            .fallback(not_found)
            .layer(from_fn_with_state(state.clone(), cors_middleware))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
