//! HTTP response helpers.

use crate::embed;
use anyhow::Result;
use serde::Serialize;
use tiny_http::{Header, Request, Response, StatusCode};

/// Respond with the embedded UI page.
pub fn respond_index(request: Request) -> Result<()> {
    let response = Response::from_string(embed::INDEX_HTML).with_header(
        Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap(),
    );
    request.respond(response)?;
    Ok(())
}

/// Respond with a JSON payload.
pub fn respond_json<T: Serialize>(request: Request, status: u16, payload: &T) -> Result<()> {
    let body = serde_json::to_string(payload)?;
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
    request.respond(response)?;
    Ok(())
}

/// Respond with a JSON error object.
pub fn respond_error(request: Request, status: u16, message: &str) -> Result<()> {
    respond_json(request, status, &serde_json::json!({ "error": message }))
}

/// 404 for unknown routes.
pub fn respond_not_found(request: Request) -> Result<()> {
    respond_error(request, 404, "not found")
}

/// 503 once shutdown has been requested.
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_error(request, 503, "server is shutting down")
}
