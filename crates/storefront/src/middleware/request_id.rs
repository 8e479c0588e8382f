//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an `x-request-id` supplied by an upstream proxy, or generates a
//! UUID v4. The ID is recorded in the request span, tagged on the Sentry
//! scope and echoed back in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound request ID accepted verbatim.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = inbound_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Upstream request ID, if present and sane.
fn inbound_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with(id: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/health");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_inbound_request_id_is_reused() {
        assert_eq!(
            inbound_request_id(&request_with(Some("abc-123"))),
            Some("abc-123".to_string())
        );
    }

    #[test]
    fn test_missing_or_oversized_request_id_is_ignored() {
        assert_eq!(inbound_request_id(&request_with(None)), None);
        assert_eq!(inbound_request_id(&request_with(Some("   "))), None);
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_eq!(inbound_request_id(&request_with(Some(&long))), None);
    }
}
