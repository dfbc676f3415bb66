//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use argon_proxy::{HttpServer, ProxyConfig, Shutdown};
use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

/// A request as seen by the upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Log = Arc<Mutex<Vec<Captured>>>;

pub struct Upstream {
    pub addr: SocketAddr,
    pub log: Log,
}

impl Upstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.log.lock().unwrap().clone()
    }
}

async fn capture(log: &Log, request: Request) -> Captured {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let captured = Captured {
        method: parts.method,
        uri: parts.uri.to_string(),
        headers: parts.headers,
        body,
    };
    log.lock().unwrap().push(captured.clone());
    captured
}

async fn echo(State(log): State<Log>, request: Request) -> Response {
    let captured = capture(&log, request).await;
    (
        StatusCode::OK,
        [
            ("content-type", "text/plain"),
            ("access-control-allow-origin", "https://upstream.example"),
            ("access-control-allow-credentials", "false"),
            ("x-upstream", "yes"),
        ],
        format!("{} {} {}", captured.method, captured.uri, String::from_utf8_lossy(&captured.body)),
    )
        .into_response()
}

async fn status(State(log): State<Log>, Path(code): Path<u16>, request: Request) -> Response {
    capture(&log, request).await;
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {code}")).into_response()
}

async fn slow(State(log): State<Log>, request: Request) -> Response {
    capture(&log, request).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    "finally".into_response()
}

/// Endless body: a 16 KiB chunk every 20 ms.
async fn endless(State(log): State<Log>, request: Request) -> Response {
    capture(&log, request).await;
    let chunks = futures_util::stream::unfold((), |()| async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Some((Ok::<_, std::io::Error>(Bytes::from(vec![b'x'; 16 * 1024])), ()))
    });
    Body::from_stream(chunks).into_response()
}

/// Start an upstream that records every request and echoes it back.
///
/// `/status/{code}` answers with that status, `/slow` waits 3 seconds,
/// `/stream` never finishes its body, everything else echoes
/// `METHOD URI BODY`.
pub async fn start_upstream() -> Upstream {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/status/{code}", any(status))
        .route("/slow", any(slow))
        .route("/stream", any(endless))
        .fallback(echo)
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Upstream { addr, log }
}

pub struct Proxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Proxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> Proxy {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Proxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Formatted log output of the current thread's default subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Capture logs on this thread until the guard drops. Tasks spawned on a
    /// current-thread runtime log here too.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Poll for up to two seconds until `needle` shows up.
    pub async fn wait_for(&self, needle: &str) -> bool {
        for _ in 0..40 {
            if self.text().contains(needle) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
