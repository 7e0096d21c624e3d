//! Router configuration for the webmail API.

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    compose, delete_mail, get_inbox, get_mail, get_mail_count, restore_mail, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/inbox", get(get_inbox))
        .route("/inbox/count", get(get_mail_count))
        .route("/mails/:id", get(get_mail).delete(delete_mail))
        .route("/mails/:id/restore", post(restore_mail))
        .route("/compose", post(compose));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}

/// Serve the frontend bundle at `path`, falling back to its `index.html` so
/// client-side routes resolve.
///
/// Returns `None` if `path` is not a directory.
pub fn create_static_router(path: &str) -> Option<Router> {
    let dir = Path::new(path);
    if !dir.is_dir() {
        tracing::warn!(path, "static path is not a directory, frontend not served");
        return None;
    }

    let index = ServeFile::new(dir.join("index.html"));
    Some(Router::new().fallback_service(ServeDir::new(dir).fallback(index)))
}
