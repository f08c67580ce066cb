//! Router configuration and route composition.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::require_token;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers::{auth, health, policies, reports, stats};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login));

    // Protected routes (require Bearer token)
    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route(
            "/polizas",
            get(policies::list_policies).post(policies::create_policy),
        )
        .route("/polizas/estadisticas", get(stats::get_stats))
        .route(
            "/polizas/:id",
            get(policies::get_policy).delete(policies::delete_policy),
        )
        .route("/polizas/reportes/excel", post(reports::excel_report))
        .route("/polizas/reportes/pdf", post(reports::pdf_report))
        .layer(middleware::from_fn_with_state(state.clone(), require_token));

    let api_routes = public_routes.merge(protected_routes);

    // Configure CORS based on environment
    let cors_layer = build_cors_layer(&config.cors_origins);

    let mut app = Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware layers (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Per-IP rate limiting (Arc required for cloning in layers)
    let governor_config = (config.rate_limit_rps > 0)
        .then(|| {
            GovernorConfigBuilder::default()
                .per_millisecond((1000 / u64::from(config.rate_limit_rps)).max(1))
                .burst_size(config.rate_limit_burst)
                .finish()
        })
        .flatten();

    match governor_config {
        Some(governor_config) => {
            app = app
                .layer(GovernorLayer {
                    config: Arc::new(governor_config),
                })
                .layer(middleware::map_response(rate_limit_body));
        }
        None => warn!("Rate limiting disabled"),
    }

    app.with_state(state)
}

/// Replaces the governor's plain-text 429 with the API's JSON error body,
/// keeping its retry headers.
async fn rate_limit_body(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let mut json = ApiError::RateLimitExceeded.into_response();
    for (name, value) in response.headers() {
        if *name != header::CONTENT_TYPE && *name != header::CONTENT_LENGTH {
            json.headers_mut().insert(name.clone(), value.clone());
        }
    }
    json
}

/// Build CORS layer from configuration.
///
/// If `origins` is "*", allows any origin without credentials (for development).
/// Otherwise, parses comma-separated origins and allows the session cookie.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(3600));

    if origins == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(allowed).allow_credentials(true)
    }
}
