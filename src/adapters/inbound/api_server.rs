//! Geolocation Lookup API Server
//!
//! HTTP API resolving an IP address to its stored geolocation record.

use crate::application::{LookupError, LookupService};
use crate::infrastructure::shutdown::ShutdownController;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Error body returned for every non-200 response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub lookup: Arc<LookupService>,
}

impl ApiState {
    pub fn new(lookup: Arc<LookupService>) -> Self {
        Self { lookup }
    }
}

/// API Server for geolocation lookups.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, lookup: Arc<LookupService>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(lookup),
        }
    }

    /// Build the router. Exposed separately so tests can drive it in-process.
    pub fn router(state: ApiState) -> Router {
        Router::new()
            // Health endpoint
            .route("/health", get(health_handler))
            // Lookup
            .route("/geolocation/:ip", get(geolocation_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the API server until `shutdown` fires.
    pub async fn run(&self, shutdown: ShutdownController) -> anyhow::Result<()> {
        let app = Self::router(self.state.clone());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("geolocation API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("geolocation API stopped");
        Ok(())
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorResponse {
        code: status.as_u16(),
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn geolocation_handler(State(state): State<ApiState>, Path(ip): Path<String>) -> Response {
    tracing::info!("received geoinfo request for ip {}", ip);

    match state.lookup.lookup(&ip).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(LookupError::InvalidIp(_)) => error_response(StatusCode::BAD_REQUEST, "Invalid IP"),
        Err(LookupError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "No geoinfo found for the given IP")
        }
        Err(LookupError::Store(_)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GeoRecord;
    use crate::domain::ports::{GeoRepository, StoreError};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct MockRepo;

    #[async_trait]
    impl GeoRepository for MockRepo {
        async fn fetch_one(&self, ip_address: &str) -> Result<GeoRecord, StoreError> {
            match ip_address {
                "160.103.7.140" => Ok(GeoRecord {
                    ip_address: "160.103.7.140".to_string(),
                    country_code: "CZ".to_string(),
                    country: "Nicaragua".to_string(),
                    city: "New Neva".to_string(),
                    latitude: -68.31023296602508,
                    longitude: -37.62435199624531,
                    mystery_value: "7301823115".to_string(),
                }),
                "6.6.6.6" => Err(StoreError::Task("connection reset".to_string())),
                _ => Err(StoreError::NotFound),
            }
        }
    }

    fn app() -> Router {
        let lookup = Arc::new(LookupService::new(Arc::new(MockRepo)));
        ApiServer::router(ApiState::new(lookup))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_lookup_ok() {
        let (status, body) = get_json("/geolocation/160.103.7.140").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ip_address"], "160.103.7.140");
        assert_eq!(body["country_code"], "CZ");
        assert_eq!(body["country"], "Nicaragua");
        assert_eq!(body["city"], "New Neva");
        assert_eq!(body["latitude"], -68.31023296602508);
        assert_eq!(body["longitude"], -37.62435199624531);
        assert_eq!(body["mystery_value"], "7301823115");
    }

    #[tokio::test]
    async fn test_lookup_invalid_ip() {
        let (status, body) = get_json("/geolocation/0.0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Invalid IP");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let (status, body) = get_json("/geolocation/8.8.8.8").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "No geoinfo found for the given IP");
    }

    #[tokio::test]
    async fn test_lookup_store_error() {
        let (status, body) = get_json("/geolocation/6.6.6.6").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 500);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let lookup = Arc::new(LookupService::new(Arc::new(MockRepo)));
        let server = ApiServer::new("127.0.0.1:0".to_string(), lookup);
        let shutdown = ShutdownController::new();
        shutdown.shutdown();

        let result =
            tokio::time::timeout(std::time::Duration::from_secs(2), server.run(shutdown)).await;

        assert!(matches!(result, Ok(Ok(()))));
    }
}
