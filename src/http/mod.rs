//! HTTP transport for a [`ResourceEndpoint`](crate::endpoint::ResourceEndpoint).
//!
//! Maps the six SCIM interactions of a resource collection onto axum routes:
//!
//! | Method | Path       | Operation |
//! |--------|------------|-----------|
//! | GET    | `/{id}`    | get       |
//! | GET    | `/`        | list      |
//! | POST   | `/`        | create    |
//! | POST   | `/.search` | search    |
//! | PUT    | `/{id}`    | replace   |
//! | DELETE | `/{id}`    | delete    |
//!
//! Delegate responses are written out verbatim; errors are rendered as SCIM error
//! messages with the status the error carries. That includes bodies the transport
//! cannot read: invalid UTF-8 is a 400 `invalidSyntax`, and a body over
//! [`MAX_BODY_BYTES`] is a 413.

mod handlers;
mod response;

use crate::endpoint::ResourceEndpoint;
use crate::error::ScimError;
use crate::manager::{ManagerLocator, ResourceManagerFactory};
use crate::protocol::constants::SCIM_MEDIA_TYPE;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request},
    http::{Method, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;

/// Max request body size: 1 MiB
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Build the routes of one resource collection, relative to the collection path.
pub fn resource_routes<L, F>(endpoint: ResourceEndpoint<L, F>) -> Router
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list::<L, F>).post(handlers::create::<L, F>),
        )
        .route("/.search", axum::routing::post(handlers::search::<L, F>))
        .route(
            "/:id",
            get(handlers::get::<L, F>)
                .put(handlers::replace::<L, F>)
                .delete(handlers::delete::<L, F>),
        )
        .layer(middleware::from_fn(require_scim_content_type))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(Arc::new(endpoint))
}

/// Build the application router: the collection mounted at `collection_path` plus
/// a health check.
pub fn app<L, F>(collection_path: &str, endpoint: ResourceEndpoint<L, F>) -> Router
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    Router::new()
        .route("/health", get(health))
        .nest(collection_path, resource_routes(endpoint))
}

/// Middleware: reject POST/PUT bodies not sent as `application/scim+json`.
async fn require_scim_content_type(req: Request, next: Next) -> Response {
    if matches!(*req.method(), Method::POST | Method::PUT) {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !is_scim_media_type(content_type) {
            let media_type = if content_type.is_empty() {
                "(none)".to_string()
            } else {
                content_type.to_string()
            };
            return ScimError::UnsupportedMediaType { media_type }.into_response();
        }
    }
    next.run(req).await
}

fn is_scim_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(SCIM_MEDIA_TYPE))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}
