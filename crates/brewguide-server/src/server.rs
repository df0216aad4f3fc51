//! HTTP server implementation for the café lookup API.
//!
//! Serves a single lookup endpoint backed by an immutable [`CafeCatalog`],
//! plus the usual health and status endpoints.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use brewguide_core::{CafeCatalog, Error, Result};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".parse().unwrap(),
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap()),
            cors: self.cors.unwrap_or(true),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The city → café catalog. Immutable after startup.
    pub catalog: CafeCatalog,
    /// Server configuration.
    pub config: ServerConfig,
    /// Server start time.
    pub start_time: Instant,
}

impl AppState {
    /// Creates new app state with the given config and catalog.
    pub fn new(config: ServerConfig, catalog: CafeCatalog) -> Self {
        Self {
            catalog,
            config,
            start_time: Instant::now(),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server with the given configuration and the built-in
    /// default catalog.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_catalog(config, CafeCatalog::default())
    }

    /// Creates a new server with an explicit catalog.
    pub fn with_catalog(config: ServerConfig, catalog: CafeCatalog) -> Self {
        let state = Arc::new(AppState::new(config.clone(), catalog));
        Self { config, state }
    }

    /// Creates the router.
    fn router(&self) -> Router {
        let mut router = Router::new()
            // Lookup endpoint
            .route("/cafe", get(cafe))
            // Health endpoints
            .route("/health", get(health))
            .route("/ready", get(ready))
            // Internal management endpoints
            .route("/api/status", get(server_status))
            .with_state(self.state.clone());

        // Add middleware
        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Runs the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot start.
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        tracing::info!(
            addr = %self.config.addr,
            cities = self.state.catalog.city_count(),
            "Starting brewguide server"
        );
        eprintln!(
            "\n\x1b[32m✓\x1b[0m Server listening on http://{}",
            self.config.addr
        );
        eprintln!("  Press Ctrl+C to stop\n");

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(Error::Io)?;

        // Set up graceful shutdown
        let shutdown_signal = async {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                () = ctrl_c => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received Ctrl+C, shutting down gracefully...");
                },
                () = terminate => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received SIGTERM, shutting down gracefully...");
                },
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| Error::internal(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        eprintln!("\x1b[32m✓\x1b[0m Server stopped");

        Ok(())
    }
}

fn bad_request(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

// === Lookup Endpoint ===

/// Query parameters for the lookup endpoint.
///
/// Both fields are raw strings so that "missing", "empty", and "unparseable"
/// can produce distinct client errors.
#[derive(Debug, Deserialize)]
struct CafeQuery {
    city: Option<String>,
    count: Option<String>,
}

async fn cafe(State(state): State<Arc<AppState>>, Query(query): Query<CafeQuery>) -> Response {
    // An empty count parameter reads the same as an absent one.
    let raw_count = match query.count.as_deref() {
        None | Some("") => return bad_request("count missing"),
        Some(raw) => raw,
    };

    let count = match raw_count.parse::<i64>() {
        Ok(n) if n >= 0 => n as usize,
        _ => return bad_request("wrong count value"),
    };

    let city = query.city.as_deref().unwrap_or_default();

    match state.catalog.first_cafes(city, count) {
        Some(cafes) => {
            tracing::debug!(city = %city, count, returned = cafes.len(), "Café lookup");
            (StatusCode::OK, cafes.join(",")).into_response()
        }
        None => bad_request("wrong city value"),
    }
}

// === Health Endpoints ===

async fn health() -> &'static str {
    "OK"
}

async fn ready() -> &'static str {
    // The catalog is built before the listener binds, so the server is ready
    // as soon as it accepts connections.
    "Ready"
}

#[derive(Debug, Serialize)]
struct ServerStatus {
    status: String,
    uptime_seconds: u64,
    cities: usize,
}

async fn server_status(State(state): State<Arc<AppState>>) -> Json<ServerStatus> {
    Json(ServerStatus {
        status: "running".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        cities: state.catalog.city_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Server::new(ServerConfig::default()).router()
    }

    async fn get_response(uri: &str) -> (StatusCode, String) {
        let response = test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_cafe_count_more_than_total_returns_full_list() {
        let (status, body) = get_response("/cafe?city=moscow&count=10").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.is_empty());
        assert_eq!(body.split(',').count(), 4);
    }

    #[tokio::test]
    async fn test_cafe_count_within_bounds_returns_exact_count() {
        let (status, body) = get_response("/cafe?city=moscow&count=3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.split(',').count(), 3);
    }

    #[tokio::test]
    async fn test_cafe_unknown_city() {
        let (status, body) = get_response("/cafe?city=test&count=3").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "wrong city value");
    }

    #[tokio::test]
    async fn test_cafe_missing_city_is_unknown() {
        let (status, body) = get_response("/cafe?count=3").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "wrong city value");
    }

    #[tokio::test]
    async fn test_cafe_negative_count() {
        let (status, body) = get_response("/cafe?city=moscow&count=-1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "wrong count value");
    }

    #[tokio::test]
    async fn test_cafe_non_numeric_count() {
        let (status, body) = get_response("/cafe?city=moscow&count=two").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "wrong count value");
    }

    #[tokio::test]
    async fn test_cafe_missing_count() {
        let (status, body) = get_response("/cafe?city=moscow").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "count missing");
    }

    #[tokio::test]
    async fn test_cafe_empty_count_reads_as_missing() {
        let (status, body) = get_response("/cafe?city=moscow&count=").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "count missing");
    }

    #[tokio::test]
    async fn test_cafe_zero_count_returns_empty_body() {
        let (status, body) = get_response("/cafe?city=moscow&count=0").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_cafe_count_checks_precede_city_check() {
        // Both parameters are bad; the count error wins.
        let (status, body) = get_response("/cafe?city=test&count=-5").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "wrong count value");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = get_response("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (status, body) = get_response("/api/status").await;

        assert_eq!(status, StatusCode::OK);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["status"], "running");
        assert_eq!(parsed["cities"], 1);
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .addr("127.0.0.1:3000".parse().unwrap())
            .cors(false)
            .build();

        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert!(!config.cors);
    }
}
