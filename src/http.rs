//! HTTP transport - maps HTTP requests to collection handlers.
//!
//! Requires the `http` feature. Uses axum for routing and tower-http for
//! CORS, static files and request tracing.
//!
//! ## Routes
//!
//! - `GET /` - the front-end entry page (`<static_dir>/index.html`).
//! - `GET /static/*` - files under `<static_dir>`, served verbatim.
//! - `GET /health` - `{ "ok": true }`.
//! - `GET|POST /api/{clients,products,invoices}` - list / create.
//! - `GET|PUT|DELETE /api/{clients,products,invoices}/:id` - get / update / delete.
//! - `GET /api/invoices/search?client_id&date_start&date_end` - filtered invoices.
//!
//! Errors are returned as `{ "error": "<message>" }` with the status code
//! from [`HandlerError::status_code`].
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use client_ledger::{http, InMemoryStore};
//!
//! let state = http::AppState::new(Arc::new(InMemoryStore::new()), "static");
//! http::serve(state, "0.0.0.0:8000").await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::document::{Fields, Stored};
use crate::handlers::invoices::SearchQuery;
use crate::handlers::{self, Deleted, HandlerError};
use crate::model::{InvoiceCreate, InvoiceUpdate};
use crate::store::DocumentStore;

/// Shared state handed to every route: the injected store and the asset root.
pub struct AppState<S> {
    store: Arc<S>,
    static_dir: PathBuf,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            static_dir: self.static_dir.clone(),
        }
    }
}

impl<S: DocumentStore + 'static> AppState<S> {
    pub fn new(store: Arc<S>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            static_dir: static_dir.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

type JsonResult<T> = Result<Json<T>, HandlerError>;

/// Build the axum `Router` for the whole service.
pub fn router<S: DocumentStore + 'static>(state: AppState<S>) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(index::<S>))
        .route("/health", get(health))
        .route("/api/clients", get(list_clients::<S>).post(create_client::<S>))
        .route(
            "/api/clients/:id",
            get(get_client::<S>)
                .put(update_client::<S>)
                .delete(delete_client::<S>),
        )
        .route("/api/products", get(list_products::<S>).post(create_product::<S>))
        .route(
            "/api/products/:id",
            get(get_product::<S>)
                .put(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .route("/api/invoices", get(list_invoices::<S>).post(create_invoice::<S>))
        .route("/api/invoices/search", get(search_invoices::<S>))
        .route(
            "/api/invoices/:id",
            get(get_invoice::<S>)
                .put(update_invoice::<S>)
                .delete(delete_invoice::<S>),
        )
        .nest_service("/static", assets)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the service over HTTP at the given address until Ctrl+C.
pub async fn serve<S: DocumentStore + 'static>(
    state: AppState<S>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| HandlerError::Validation(rejection.body_text()))
}

/// `GET /` - the front-end entry page.
async fn index<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, HandlerError> {
    let path = state.static_dir.join("index.html");
    tokio::fs::read_to_string(&path).await.map(Html).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "index page unavailable");
        HandlerError::NotFound("Page non trouvée".into())
    })
}

/// `GET /health` - returns `{ "ok": true }`.
async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

// Clients

async fn list_clients<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> JsonResult<Vec<Stored<Fields>>> {
    handlers::clients::list(state.store()).await.map(Json)
}

async fn get_client<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> JsonResult<Stored<Fields>> {
    handlers::clients::get(state.store(), &id).await.map(Json)
}

async fn create_client<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> JsonResult<Stored<Fields>> {
    handlers::clients::create(state.store(), body(payload)?).await.map(Json)
}

async fn update_client<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> JsonResult<Stored<Fields>> {
    handlers::clients::update(state.store(), &id, body(payload)?)
        .await
        .map(Json)
}

async fn delete_client<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> JsonResult<Deleted> {
    handlers::clients::delete(state.store(), &id).await.map(Json)
}

// Products

async fn list_products<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> JsonResult<Vec<Stored<Fields>>> {
    handlers::products::list(state.store()).await.map(Json)
}

async fn get_product<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> JsonResult<Stored<Fields>> {
    handlers::products::get(state.store(), &id).await.map(Json)
}

async fn create_product<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> JsonResult<Stored<Fields>> {
    handlers::products::create(state.store(), body(payload)?)
        .await
        .map(Json)
}

async fn update_product<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> JsonResult<Stored<Fields>> {
    handlers::products::update(state.store(), &id, body(payload)?)
        .await
        .map(Json)
}

async fn delete_product<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> JsonResult<Deleted> {
    handlers::products::delete(state.store(), &id).await.map(Json)
}

// Invoices

async fn list_invoices<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> JsonResult<Vec<Stored<Fields>>> {
    handlers::invoices::list(state.store()).await.map(Json)
}

async fn get_invoice<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> JsonResult<Stored<Fields>> {
    handlers::invoices::get(state.store(), &id).await.map(Json)
}

async fn search_invoices<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> JsonResult<Vec<Stored<Fields>>> {
    let Query(query) = query.map_err(|r| HandlerError::BadRequest(r.body_text()))?;
    handlers::invoices::search(state.store(), &query)
        .await
        .map(Json)
}

async fn create_invoice<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<InvoiceCreate>, JsonRejection>,
) -> JsonResult<Stored<Fields>> {
    handlers::invoices::create(state.store(), body(payload)?)
        .await
        .map(Json)
}

async fn update_invoice<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<InvoiceUpdate>, JsonRejection>,
) -> JsonResult<Stored<Fields>> {
    handlers::invoices::update(state.store(), &id, body(payload)?)
        .await
        .map(Json)
}

async fn delete_invoice<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> JsonResult<Deleted> {
    handlers::invoices::delete(state.store(), &id).await.map(Json)
}
