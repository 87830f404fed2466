use axum::http::header;
use tower_http::cors::{Any, CorsLayer};

/// Open CORS policy; `Content-Disposition` is exposed so browsers can name report downloads.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
        .expose_headers([header::CONTENT_DISPOSITION])
}
