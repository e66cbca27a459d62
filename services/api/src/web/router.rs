//! services/api/src/web/router.rs
//!
//! Assembles the Axum router: generation routes, health check, Swagger UI and
//! the shared middleware stack.

use crate::web::{
    rest::{
        deep_dive_handler, get_questions_handler, get_title_handler, health_handler,
        method_not_allowed, ApiDoc,
    },
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router around the shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Generation routes answer any other method with the 405 envelope.
    let api_router = Router::new()
        .route(
            "/api/get-title",
            post(get_title_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/get-questions",
            post(get_questions_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/deep-dive",
            post(deep_dive_handler).fallback(method_not_allowed),
        )
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
