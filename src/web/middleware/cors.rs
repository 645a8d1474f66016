//! CORS layer for browser clients of the catalog API.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Parse the configured origins, dropping entries that are not valid header values.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect()
}

/// Create a CORS layer from the `[web] cors_origins` setting.
///
/// With no usable origins any origin is allowed (without credentials);
/// otherwise only the listed origins may call the API with credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed = parse_origins(origins);

    if parsed.is_empty() {
        return CorsLayer::new()
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(Any)
            .allow_origin(Any);
    }

    CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
        .allow_origin(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_invalid() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
        ];
        assert_eq!(parse_origins(&origins).len(), 1);
    }

    #[test]
    fn test_create_cors_layer() {
        let _permissive = create_cors_layer(&[]);
        let _strict = create_cors_layer(&["https://shop.example".to_string()]);
    }
}
