//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::SharedUserService;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub user_service: SharedUserService,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage: ComponentHealth,
    pub export_directory: String,
}

/// Component health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "User store is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<HealthState>,
) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    let ping_start = Instant::now();
    let storage = match state.user_service.ping().await {
        Ok(()) => ComponentHealth {
            status: "ok".to_string(),
            latency_ms: Some(ping_start.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "User store ping failed");
            ComponentHealth {
                status: "error".to_string(),
                latency_ms: None,
            }
        }
    };

    let (http_status, overall) = if storage.status == "ok" {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status: overall.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            storage,
            export_directory: state
                .user_service
                .exporter()
                .directory()
                .display()
                .to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::application::{FileExporter, UserService};
    use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};
    use crate::infrastructure::storage::InMemoryUserRepository;

    struct Unreachable;

    #[async_trait]
    impl UserRepositoryInterface for Unreachable {
        async fn find_by_id(&self, _id: i32) -> DomainResult<Option<User>> {
            Err(DomainError::Storage("connection refused".into()))
        }
        async fn find_by_oib(&self, _oib: &str) -> DomainResult<Option<User>> {
            Err(DomainError::Storage("connection refused".into()))
        }
        async fn save(&self, _user: User) -> DomainResult<User> {
            Err(DomainError::Storage("connection refused".into()))
        }
        async fn delete_by_oib(&self, _oib: &str) -> DomainResult<()> {
            Err(DomainError::Storage("connection refused".into()))
        }
        async fn ping(&self) -> DomainResult<()> {
            Err(DomainError::Storage("connection refused".into()))
        }
    }

    fn router(repo: Arc<dyn UserRepositoryInterface>) -> Router {
        let state = HealthState {
            user_service: Arc::new(UserService::new(repo, FileExporter::default())),
            started_at: Arc::new(Instant::now()),
        };
        Router::new()
            .route("/health", get(health_check))
            .with_state(state)
    }

    async fn call(router: Router) -> (StatusCode, serde_json::Value) {
        let resp = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn healthy_store_reports_ok() {
        let (status, json) = call(router(Arc::new(InMemoryUserRepository::new()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["storage"]["status"], "ok");
        assert_eq!(json["export_directory"], ".");
    }

    #[tokio::test]
    async fn failing_store_reports_degraded() {
        let (status, json) = call(router(Arc::new(Unreachable))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["storage"]["latency_ms"], serde_json::Value::Null);
    }
}
