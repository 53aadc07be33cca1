//! Health check endpoints
//!
//! - `/health` - process is up
//! - `/health/ready` - database reachable (503 otherwise)
//! - `/health/live` - always OK while serving

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DependencyStatus>,
}

/// Status of the database dependency
#[derive(Debug, Serialize)]
pub struct DependencyStatus {
    pub healthy: bool,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            service: "devconnector",
            version: env!("CARGO_PKG_VERSION"),
            database: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// Readiness probe; 503 while the database is unreachable
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = dependency_status(db::ping(state.db()).await);

    let (code, status) = if database.healthy {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    let mut response = HealthResponse::new(status);
    response.database = Some(database);

    (code, Json(response))
}

/// Connection errors go to the log only; the endpoint is public
fn dependency_status(ping: anyhow::Result<()>) -> DependencyStatus {
    match ping {
        Ok(()) => DependencyStatus { healthy: true },
        Err(e) => {
            warn!(error = %e, "readiness check: database unreachable");
            DependencyStatus { healthy: false }
        }
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "devconnector");
        assert!(response.database.is_none());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[test]
    fn test_unreachable_database_hides_error_text() {
        let status = dependency_status(Err(anyhow::anyhow!(
            "error connecting to db.internal:5432 as postgres"
        )));

        assert!(!status.healthy);
        let body = serde_json::to_value(&status).unwrap();
        assert_eq!(body, serde_json::json!({ "healthy": false }));
    }
}
