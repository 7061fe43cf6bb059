//! Response helpers.
//!
//! Small constructors over `http::Response<Bytes>`. None of them can fail:
//! headers are static and bodies are already bytes.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde_json::Value;

use crate::Response;

/// Response with `status` and no body
#[must_use]
pub fn empty(status: StatusCode) -> Response {
    let mut res = Response::new(Bytes::new());
    *res.status_mut() = status;
    res
}

/// The router's default fallback: 404, empty body
#[must_use]
pub fn not_found() -> Response {
    empty(StatusCode::NOT_FOUND)
}

/// Plain-text response
#[must_use]
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    let mut res = Response::new(Bytes::from(body.into()));
    *res.status_mut() = status;
    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}

/// JSON response
#[must_use]
pub fn json(status: StatusCode, body: &Value) -> Response {
    let mut res = Response::new(Bytes::from(body.to_string()));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}
