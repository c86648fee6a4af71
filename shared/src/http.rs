//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};

/// Create a plain-text response with the given status code.
pub fn text_response(
    status: u16,
    message: impl Into<String>,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "text/plain")
        .body(Body::from(message.into()))?)
}
