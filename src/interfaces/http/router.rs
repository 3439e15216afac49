//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::SharedUserService;

use super::modules::{health, metrics, users};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Users
        users::get_user,
        users::create_user,
        users::delete_user,
        users::generate_file,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            users::UserDto,
            users::CreateUserRequest,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "Users keyed by OIB: create, fetch, delete and export to a flat file"),
    ),
    info(
        title = "OIB User Service API",
        version = "1.0.0",
        description = "REST API for managing users identified by their Croatian OIB",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    user_service: SharedUserService,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let user_state = users::UserHandlerState {
        user_service: user_service.clone(),
    };

    let user_routes = Router::new()
        .route("/user", axum::routing::post(users::create_user))
        .route(
            "/user/{oib}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/generate/{oib}", get(users::generate_file))
        .with_state(user_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            user_service,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api", user_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
