//! HTTP surface for the todo service.
//!
//! # Design
//! Handlers take the raw request body and hand it to the validator for the
//! configured backend, so malformed JSON is reported with the same error
//! shape as a missing field. The router is written once against
//! `dyn TodoStore`; which backend sits behind it is decided at startup.
//! Body-limit rejections and unmatched routes or methods answer with the
//! same JSON error body as store failures.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::warn;

use todo_core::{validate_create, validate_update, Backend, Todo, TodoStore};

pub mod config;
pub mod error;
pub mod telemetry;

pub use error::ApiError;

/// Store handle shared by every request.
pub type SharedStore = Arc<dyn TodoStore>;

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .fallback(error::route_not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn run_until<F>(
    listener: TcpListener,
    store: SharedStore,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health(State(store): State<SharedStore>) -> (StatusCode, Json<Value>) {
    let backend = store.backend().as_str();
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "backend": backend })),
        ),
        Err(err) => {
            warn!(backend, error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "backend": backend })),
            )
        }
    }
}

async fn list_todos(State(store): State<SharedStore>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(store.list().await?))
}

async fn create_todo(
    State(store): State<SharedStore>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let body = body?;
    let backend = store.backend();
    let input = validate_create(backend, &body)?;
    let todo = store.create(input).await?;
    Ok((created_status(backend), Json(todo)))
}

async fn get_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(store.get(&id).await?))
}

async fn update_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Todo>, ApiError> {
    let body = body?;
    let update = validate_update(store.backend(), &body)?;
    Ok(Json(store.update(&id, update).await?))
}

async fn delete_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The relational service answers a create with 200, the document service
/// with 201.
fn created_status(backend: Backend) -> StatusCode {
    match backend {
        Backend::Relational => StatusCode::OK,
        Backend::Document => StatusCode::CREATED,
    }
}
