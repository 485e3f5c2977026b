//! CORS policy
//!
//! The portal's web client is hosted separately, so every origin is allowed
//! and pre-flight requests are answered with an empty 200.

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, Method,
};
use tower_http::cors::{Any, CorsLayer};

pub const CLIENT_INFO_HEADER: &str = "x-client-info";
pub const API_KEY_HEADER: &str = "apikey";

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(CLIENT_INFO_HEADER),
            HeaderName::from_static(API_KEY_HEADER),
        ])
}
