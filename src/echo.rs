use http::StatusCode;
use serde_json::json;

use crate::handler::{sync_handler, Handler};
use crate::response;

/// Introspection handler: answers with JSON describing the matched route
///
/// ```json
/// { "handler": "get_pet", "method": "GET", "path": "/pets/1", "params": { "id": "1" } }
/// ```
#[must_use]
pub fn echo_handler(name: impl Into<String>) -> impl Handler {
    let name = name.into();
    sync_handler(move |req, ctx| {
        let body = json!({
            "handler": name,
            "method": req.method().as_str(),
            "path": req.uri().path(),
            "params": ctx.params,
        });
        Ok(Some(response::json(StatusCode::OK, &body)))
    })
}
