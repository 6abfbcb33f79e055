//! # API REST
//!
//! HTTP surface of the Shelf gateway.
//!
//! Handles:
//! - The `/api` resource: list, read, write, delete, preflight
//! - `/health` for liveness probes
//! - CORS, panic containment, OpenAPI/Swagger documentation
//!
//! The router is stateless between requests: the only shared state is the
//! configured [`ContentsStore`], and every request is one independent
//! translation into at most two upstream calls.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use shelf_core::ContentsStore;

/// Application state for the gateway REST surface.
///
/// `store` is `None` when required configuration was missing at startup;
/// handlers then answer with the configuration error before any upstream
/// call is attempted.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn ContentsStore>>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn ContentsStore>>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> Result<&Arc<dyn ContentsStore>, ApiError> {
        self.store.as_ref().ok_or(ApiError::Misconfigured)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        handlers::read_or_list,
        handlers::write,
        handlers::remove,
    ),
    components(schemas(shelf_core::RemoteFile, HealthRes))
)]
struct ApiDoc;

/// Health check response body
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Builds the gateway router.
///
/// Every response leaves through the CORS layer; panics anywhere in a
/// handler are converted to a 500 by the outermost-but-one layer rather
/// than tearing down the connection.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api",
            get(handlers::read_or_list)
                .post(handlers::write)
                .delete(handlers::remove)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::new())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the gateway
///
/// Used by the CLI's online/offline probe and load balancer checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Shelf gateway is alive".into(),
    })
}
