//! CORS middleware configuration.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

const METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers(Any)
        .allow_origin(Any)
}

/// Create a CORS layer from the configured origins.
///
/// No origins, or none that parse, means any origin is allowed.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        return permissive();
    }

    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_origin(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cors_layer_empty_origins() {
        let _layer = create_cors_layer(&[]);
    }

    #[test]
    fn test_create_cors_layer_with_origins() {
        let origins = vec![
            "http://localhost:5173".to_string(),
            "bad\norigin".to_string(),
        ];
        let _layer = create_cors_layer(&origins);
    }
}
