pub mod api;

use axum::{extract::DefaultBodyLimit, http::{HeaderValue, Method}, routing::get, Router};
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, docs::ApiDoc, handlers::banner, state::AppState, websocket};

pub use api::create_api_routes;

/// Assemble the full application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/", get(banner))
        .route("/ws", get(websocket::websocket_handler))
        .route("/ws/:room", get(websocket::websocket_room_handler))
        // Mount API routes
        .nest("/api", create_api_routes())
        .with_state(state)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        CorsLayer::new().allow_origin(origins).allow_methods(methods).allow_headers(Any)
    } else if config.is_development() {
        CorsLayer::permissive()
    } else {
        // Same-origin only
        CorsLayer::new()
    }
}
