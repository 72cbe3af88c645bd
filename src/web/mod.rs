// src/web/mod.rs
// HTTP layer for EstateOS

pub mod api;
pub mod error;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::web::state::AppState;

/// Browser origins allowed by the configuration. Credentials may not be
/// combined with wildcard methods or headers, so the layer mirrors the
/// request instead.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let generated = ServeDir::new(&state.config.output_dir);

    let api_router = Router::new()
        .route("/health", get(api::health))
        .route("/chat-report", post(api::chat_report))
        .with_state(state.clone());

    Router::new()
        // Health check at root level
        .route("/health", get(api::health))
        .nest("/api", api_router)
        // Rendered reports
        .nest_service("/generated", generated)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

