//! Request handlers for the `/api` resource.
//!
//! Dispatch is by method plus query parameter, matching the gateway's wire
//! contract: `GET ?list=1` lists, `GET ?name=` reads, `POST ?name=` writes,
//! `DELETE ?name=` deletes, `OPTIONS` answers preflight. Each handler
//! performs at most two sequential upstream calls and maps the outcome to
//! exactly one reply.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use shelf_core::{mime, ContentsStore, RemoteFile, StoreError};
use shelf_types::{FileName, NameError};

use crate::error::ApiError;
use crate::AppState;

/// Gateway name used in upstream commit messages.
const COMMIT_TAG: &str = "Shelf";

const MISSING_NAME: &str = "Missing required query param: ?name= or ?list=1";
const INVALID_NAME: &str = "Invalid filename.";

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ApiQuery {
    /// Set to `1` on a GET to list the storage root (ignores `name`)
    list: Option<String>,
    /// File path within the storage root
    name: Option<String>,
}

impl ApiQuery {
    fn wants_listing(&self) -> bool {
        self.list.as_deref() == Some("1")
    }

    /// Boundary validation. Runs before any upstream call: absent or empty
    /// names and traversal attempts never leave the gateway.
    fn file_name(&self) -> Result<FileName, ApiError> {
        match FileName::new(self.name.as_deref().unwrap_or_default()) {
            Ok(name) => Ok(name),
            Err(NameError::Empty) => Err(ApiError::BadRequest(MISSING_NAME.into())),
            Err(_) => Err(ApiError::BadRequest(INVALID_NAME.into())),
        }
    }
}

/// Maps store failures that are not operation-specific.
///
/// `NotFound` is always interpreted by the caller first; reaching it here
/// means the adapter broke its contract, which is an internal error.
fn upstream_error(op: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::Upstream { status, body } => {
            tracing::error!("{op}: upstream answered {status}: {body}");
            ApiError::Upstream(body)
        }
        StoreError::NotFound => ApiError::Internal("unexpected not-found from upstream".into()),
        other => {
            tracing::error!("{op}: {other}");
            ApiError::Internal(other.to_string())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api",
    params(ApiQuery),
    responses(
        (status = 200, description = "File content (MIME by extension), or JSON listing when list=1", body = [RemoteFile]),
        (status = 400, description = "Missing or invalid filename"),
        (status = 404, description = "File not found"),
        (status = 502, description = "Upstream store error")
    )
)]
/// Read one file, or list the storage root when `list=1`.
#[axum::debug_handler]
pub(crate) async fn read_or_list(
    State(state): State<AppState>,
    Query(q): Query<ApiQuery>,
) -> Result<Response, ApiError> {
    let store = state.store()?;

    if q.wants_listing() {
        return list(store).await;
    }

    let name = q.file_name()?;
    match store.fetch(&name).await {
        Ok(file) => Ok((
            [(header::CONTENT_TYPE, mime::mime_for(&name))],
            file.content,
        )
            .into_response()),
        Err(StoreError::NotFound) => Err(ApiError::NotFound(name.to_string())),
        Err(e) => Err(upstream_error("read", e)),
    }
}

async fn list(store: &Arc<dyn ContentsStore>) -> Result<Response, ApiError> {
    match store.list().await {
        Ok(files) => Ok(Json(files).into_response()),
        // An uninitialised storage root is a valid empty store, not an
        // error.
        Err(StoreError::NotFound) => Ok(Json(Vec::<RemoteFile>::new()).into_response()),
        Err(e) => Err(upstream_error("list", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api",
    params(ApiQuery),
    request_body(content = String, description = "Raw file content, treated as opaque bytes"),
    responses(
        (status = 200, description = "File created or updated"),
        (status = 400, description = "Missing or invalid filename"),
        (status = 502, description = "Upstream store error")
    )
)]
/// Create or overwrite one file with the raw request body.
#[axum::debug_handler]
pub(crate) async fn write(
    State(state): State<AppState>,
    Query(q): Query<ApiQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let store = state.store()?;
    let name = q.file_name()?;

    // Probe for a prior version; its sha is the upstream precondition for
    // overwrite. A concurrent writer landing between this probe and the
    // put below is rejected by the upstream hash check and surfaced as-is:
    // single attempt, no retry.
    let prior = match store.stat(&name).await {
        Ok(prior) => prior,
        Err(e) => return Err(upstream_error("write probe", e)),
    };

    let action = if prior.is_some() { "Update" } else { "Upload" };
    let message = format!("{action} {name} via {COMMIT_TAG}");

    match store.put(&name, &body, &message, prior.as_deref()).await {
        Ok(()) => {
            let outcome = if prior.is_some() { "updated" } else { "created" };
            Ok((StatusCode::OK, format!("File {outcome}: {name}")).into_response())
        }
        Err(e) => Err(upstream_error("write", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api",
    params(ApiQuery),
    responses(
        (status = 200, description = "File deleted"),
        (status = 400, description = "Missing or invalid filename"),
        (status = 404, description = "File not found"),
        (status = 502, description = "Upstream store error")
    )
)]
/// Delete one file. Requires a fresh probe of its current version token.
#[axum::debug_handler]
pub(crate) async fn remove(
    State(state): State<AppState>,
    Query(q): Query<ApiQuery>,
) -> Result<Response, ApiError> {
    let store = state.store()?;
    let name = q.file_name()?;

    let sha = match store.stat(&name).await {
        Ok(Some(sha)) => sha,
        Ok(None) => return Err(ApiError::NotFound(name.to_string())),
        Err(e) => return Err(upstream_error("delete probe", e)),
    };

    let message = format!("Delete {name} via {COMMIT_TAG}");
    match store.delete(&name, &sha, &message).await {
        Ok(()) => Ok((StatusCode::OK, format!("File deleted: {name}")).into_response()),
        Err(e) => Err(upstream_error("delete", e)),
    }
}

/// Bare preflight reply. Browser preflights carrying request headers are
/// answered by the CORS layer before they reach this handler.
#[axum::debug_handler]
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Unrouted methods on `/api`. Configuration and name validation still win
/// over method dispatch, matching the gateway's check order.
#[axum::debug_handler]
pub(crate) async fn method_not_allowed(
    State(state): State<AppState>,
    Query(q): Query<ApiQuery>,
) -> Result<Response, ApiError> {
    state.store()?;
    q.file_name()?;
    Err(ApiError::MethodNotAllowed)
}
