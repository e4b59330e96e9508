//! The storage port and its backend adapters.
//!
//! # Design
//! `TodoStore` is the single contract the HTTP surface talks to. Each
//! operation touches at most one record and maps onto one backend statement
//! or command, so a failed call never leaves a record half-written and never
//! affects later calls. Handles are built once at startup and passed in
//! explicitly; no module-level connection state exists.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::{BackendError, StoreError, StoreResult};
use crate::id::IdCodec;
use crate::types::{Backend, NewTodo, Todo, TodoUpdate};

pub mod mongo;
pub mod sqlite;

pub use mongo::{MongoTodoStore, TodoDocument};
pub use sqlite::SqliteTodoStore;

/// CRUD contract every todo backend implements.
///
/// Calls may arrive concurrently from many requests; implementations keep
/// each call self-contained and add no ordering between calls.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Which backend variant this store is.
    fn backend(&self) -> Backend;

    /// Persists a new item and returns it with its store-assigned id.
    async fn create(&self, input: NewTodo) -> StoreResult<Todo>;

    /// Returns every item. The order is whatever the backend yields and is
    /// not part of the contract.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    /// Fetches one item. A malformed id is `NotFound`.
    async fn get(&self, id: &str) -> StoreResult<Todo>;

    /// Replaces the mutable fields this backend accepts and returns the
    /// updated item.
    async fn update(&self, id: &str, update: TodoUpdate) -> StoreResult<Todo>;

    /// Removes one item. Deleting an unknown id is `NotFound`.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Round-trips to the backend without touching any record.
    async fn ping(&self) -> StoreResult<()>;
}

/// Decodes a wire id, reporting a malformed one as `NotFound`.
pub(crate) fn decode_id<C: IdCodec>(backend: Backend, token: &str) -> StoreResult<C::Key> {
    C::decode(token).map_err(|err| {
        debug!(backend = backend.as_str(), error = %err, "rejecting malformed id");
        StoreError::not_found(token)
    })
}

/// Classifies a low-level failure as `BackendUnavailable`, logging the
/// backend text that the classified error hides.
pub(crate) fn backend_failure(
    backend: Backend,
    op: &'static str,
    err: impl Into<BackendError>,
) -> StoreError {
    let err = err.into();
    error!(backend = backend.as_str(), op, error = %err, "storage operation failed");
    StoreError::BackendUnavailable(err)
}
