//! HTTP server for the Prometheus metrics endpoint.

use crate::metrics::MetricsRegistry;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Port the agent listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self::with_port(DEFAULT_PORT)
    }
}

impl MetricsServerConfig {
    /// Creates a config listening on all interfaces at `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        }
    }
}

/// HTTP server exposing the metrics hub.
pub struct MetricsServer {
    config: MetricsServerConfig,
    hub: Arc<MetricsRegistry>,
}

impl MetricsServer {
    /// Creates a new metrics server.
    pub fn new(config: MetricsServerConfig, hub: Arc<MetricsRegistry>) -> Self {
        Self { config, hub }
    }

    /// Builds the router: `/metrics` and `/health`.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.hub))
    }

    /// Binds the configured address.
    ///
    /// Kept separate from [`serve`](Self::serve) so startup can fail fast
    /// before sampling begins.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.bind_addr;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Serves scrapes on `listener` until the task is dropped.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(addr = %addr, "Metrics server listening");
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))
    }
}

/// Handler for the /metrics endpoint.
async fn metrics_handler(State(hub): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    match hub.encode() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    const HEADERS: &str = "Host: localhost\r\nConnection: close\r\n\r\n";

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\n{HEADERS}");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    async fn start(hub: Arc<MetricsRegistry>) -> SocketAddr {
        let config = MetricsServerConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
        };
        let server = MetricsServer::new(config, hub);
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server.serve(listener));
        addr
    }

    #[test]
    fn test_config_default() {
        let config = MetricsServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
    }

    #[test]
    fn test_config_with_port() {
        let config = MetricsServerConfig::with_port(9100);
        assert_eq!(config.bind_addr.port(), 9100);
    }

    #[tokio::test]
    async fn test_scrape_returns_published_values() {
        let hub = Arc::new(MetricsRegistry::new());
        hub.publish(Metric::TotalProcesses, 2915.0).unwrap();
        let addr = start(Arc::clone(&hub)).await;

        let response = http_get(addr, "/metrics").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("text/plain; version=0.0.4"));
        assert!(response.contains("total_processes 2915"));

        hub.publish(Metric::TotalProcesses, 3000.0).unwrap();
        let response = http_get(addr, "/metrics").await;
        assert!(response.contains("total_processes 3000"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let addr = start(Arc::new(MetricsRegistry::new())).await;
        let response = http_get(addr, "/health").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("OK"));
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = MetricsServerConfig {
            bind_addr: taken.local_addr().unwrap(),
        };
        let server = MetricsServer::new(config, Arc::new(MetricsRegistry::new()));
        assert!(matches!(server.bind().await, Err(ServerError::Bind { .. })));
    }
}
