use std::time::Duration;

use axum::http::{
    HeaderName, HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::AllowedOrigins;

pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

const X_SPECIAL_HEADER: HeaderName = HeaderName::from_static("x-special-header");

/// Credentialed CORS policy. A wildcard origin is honoured by mirroring the
/// caller's `Origin`, since `*` cannot be combined with credentials.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match origins {
        AllowedOrigins::Any => AllowOrigin::mirror_request(),
        AllowedOrigins::List(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| warn!(%origin, "ignoring invalid CORS origin: {}", e))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, X_SPECIAL_HEADER, AUTHORIZATION])
        .max_age(PREFLIGHT_MAX_AGE)
}
