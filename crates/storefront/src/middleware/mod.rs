//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fills the span field and echoes the header)
//! 4. CORS (the shop UI may be served from another origin)

pub mod request_id;

use axum::extract::Request;
use tracing::Span;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// Build the per-request tracing span.
///
/// `request_id` starts empty and is recorded by [`request_id_middleware`].
pub fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}
