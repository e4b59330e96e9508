//! MongoDB-backed `TodoStore`.
//!
//! # Design
//! Each todo is one document `{ _id, title, completed }` in a single
//! collection. The driver client is safe to share across tasks, so no extra
//! locking is added. Filters and updates are always built with `doc!`, never
//! from strings. `update` uses `find_one_and_update` with a `$set` of both
//! mutable fields, which changes the fields in place and returns the
//! post-update document in one atomic command.
//!
//! `create` stores the caller-supplied `completed` flag, and `update`
//! requires a title.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{backend_failure, decode_id, TodoStore};
use crate::error::{BackendError, Field, StoreError, StoreResult, ValidationError};
use crate::id::{IdCodec, ObjectId, ObjectIdCodec};
use crate::types::{Backend, NewTodo, Todo, TodoUpdate};

const BACKEND: Backend = Backend::Document;

const APP_NAME: &str = "todo-server";
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Stored shape of a todo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    /// Unset on insert so the id is generated on the store side of the call.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub completed: bool,
}

impl TodoDocument {
    fn into_todo(self) -> Result<Todo, BackendError> {
        let id = self
            .id
            .ok_or_else(|| BackendError::InvalidData("todo document without `_id`".into()))?;
        Ok(Todo {
            id: ObjectIdCodec::encode(&id),
            title: self.title,
            completed: self.completed,
        })
    }
}

/// Todo store over one MongoDB collection.
#[derive(Clone)]
pub struct MongoTodoStore {
    database: Database,
    todos: Collection<TodoDocument>,
}

impl MongoTodoStore {
    pub fn new(database: Database, collection: &str) -> Self {
        let todos = database.collection::<TodoDocument>(collection);
        Self { database, todos }
    }

    /// Builds a client for `uri`. Connections are established lazily, so an
    /// unreachable server shows up on the first call (or `ping`), not here.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, BackendError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        let client = Client::with_options(options)?;
        info!(database, collection, "mongodb store configured");
        Ok(Self::new(client.database(database), collection))
    }

    fn finished(op: &'static str, started_at: Instant) {
        debug!(
            backend = BACKEND.as_str(),
            op,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "command finished"
        );
    }
}

#[async_trait]
impl TodoStore for MongoTodoStore {
    fn backend(&self) -> Backend {
        BACKEND
    }

    async fn create(&self, input: NewTodo) -> StoreResult<Todo> {
        let started_at = Instant::now();
        let mut document = TodoDocument {
            id: None,
            title: input.title().to_string(),
            completed: input.completed(),
        };
        let inserted = self
            .todos
            .insert_one(&document)
            .await
            .map_err(|err| backend_failure(BACKEND, "create", err))?;
        let id = inserted.inserted_id.as_object_id().ok_or_else(|| {
            backend_failure(
                BACKEND,
                "create",
                BackendError::InvalidData(format!(
                    "inserted id `{}` is not an ObjectId",
                    inserted.inserted_id
                )),
            )
        })?;
        document.id = Some(id);
        Self::finished("create", started_at);
        document
            .into_todo()
            .map_err(|err| backend_failure(BACKEND, "create", err))
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let started_at = Instant::now();
        let documents: Vec<TodoDocument> = self
            .todos
            .find(doc! {})
            .await
            .map_err(|err| backend_failure(BACKEND, "list", err))?
            .try_collect()
            .await
            .map_err(|err| backend_failure(BACKEND, "list", err))?;
        Self::finished("list", started_at);
        documents
            .into_iter()
            .map(TodoDocument::into_todo)
            .collect::<Result<_, _>>()
            .map_err(|err| backend_failure(BACKEND, "list", err))
    }

    async fn get(&self, id: &str) -> StoreResult<Todo> {
        let key = decode_id::<ObjectIdCodec>(BACKEND, id)?;
        let started_at = Instant::now();
        let document = self
            .todos
            .find_one(id_filter(key))
            .await
            .map_err(|err| backend_failure(BACKEND, "get", err))?
            .ok_or_else(|| StoreError::not_found(id))?;
        Self::finished("get", started_at);
        document
            .into_todo()
            .map_err(|err| backend_failure(BACKEND, "get", err))
    }

    async fn update(&self, id: &str, update: TodoUpdate) -> StoreResult<Todo> {
        let key = decode_id::<ObjectIdCodec>(BACKEND, id)?;
        let title = update
            .title()
            .ok_or(ValidationError::MissingField(Field::Title))?;
        let started_at = Instant::now();
        let document = self
            .todos
            .find_one_and_update(id_filter(key), replace_fields(title, update.completed()))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|err| backend_failure(BACKEND, "update", err))?
            .ok_or_else(|| StoreError::not_found(id))?;
        Self::finished("update", started_at);
        document
            .into_todo()
            .map_err(|err| backend_failure(BACKEND, "update", err))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let key = decode_id::<ObjectIdCodec>(BACKEND, id)?;
        let started_at = Instant::now();
        let deleted = self
            .todos
            .delete_one(id_filter(key))
            .await
            .map_err(|err| backend_failure(BACKEND, "delete", err))?;
        Self::finished("delete", started_at);
        if deleted.deleted_count == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| backend_failure(BACKEND, "ping", err))?;
        Ok(())
    }
}

fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

fn replace_fields(title: &str, completed: bool) -> Document {
    doc! { "$set": { "title": title, "completed": completed } }
}
