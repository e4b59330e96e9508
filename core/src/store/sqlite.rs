//! SQLite-backed `TodoStore`.
//!
//! # Design
//! One `rusqlite::Connection` is shared by the whole process behind a
//! `parking_lot::Mutex`. The lock is held for exactly one
//! prepare/bind/execute/finalize unit on tokio's blocking pool; there are no
//! multi-statement transactions. Writes use `RETURNING` so the
//! store-assigned id and the written row come back from the same statement.
//!
//! Only `completed` is writable through `update`. A title carried by a
//! `TodoUpdate` is ignored here.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, error, info};

use super::{backend_failure, decode_id, TodoStore};
use crate::error::{BackendError, StoreError, StoreResult};
use crate::id::{IdCodec, RowIdCodec};
use crate::types::{Backend, NewTodo, Todo, TodoUpdate};

const BACKEND: Backend = Backend::Relational;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Todo store over a single SQLite connection.
#[derive(Clone)]
pub struct SqliteTodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTodoStore {
    /// Opens (or creates) a database file and ensures the `todos` table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        Self::bootstrap("file", || Connection::open(path))
    }

    /// Opens a private in-memory database. Data lives as long as the store.
    pub fn open_in_memory() -> Result<Self, BackendError> {
        Self::bootstrap("memory", Connection::open_in_memory)
    }

    fn bootstrap(
        mode: &'static str,
        open: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> Result<Self, BackendError> {
        let started_at = Instant::now();
        let result = open().and_then(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(conn)
        });
        match result {
            Ok(conn) => {
                info!(
                    mode,
                    duration_ms = started_at.elapsed().as_millis() as u64,
                    "sqlite store opened"
                );
                Ok(Self {
                    conn: Arc::new(Mutex::new(conn)),
                })
            }
            Err(err) => {
                error!(mode, error = %err, "failed to open sqlite store");
                Err(err.into())
            }
        }
    }

    /// Runs one statement unit on the blocking pool.
    async fn run<T, F>(&self, op: &'static str, statement: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, BackendError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let started_at = Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            statement(&conn)
        })
        .await
        .map_err(|err| backend_failure(BACKEND, op, err))?
        .map_err(|err| backend_failure(BACKEND, op, err))?;
        debug!(
            backend = BACKEND.as_str(),
            op,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "statement finished"
        );
        Ok(result)
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    fn backend(&self) -> Backend {
        BACKEND
    }

    async fn create(&self, input: NewTodo) -> StoreResult<Todo> {
        let title = input.title().to_string();
        self.run("create", move |conn| {
            conn.query_row(
                "INSERT INTO todos (title, completed) VALUES (?1, 0)
                 RETURNING id, title, completed",
                params![title],
                TodoRow::read,
            )?
            .into_todo()
        })
        .await
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        self.run("list", |conn| {
            let mut stmt = conn.prepare("SELECT id, title, completed FROM todos")?;
            let rows = stmt.query_map([], TodoRow::read)?;
            let mut todos = Vec::new();
            for row in rows {
                todos.push(row?.into_todo()?);
            }
            Ok(todos)
        })
        .await
    }

    async fn get(&self, id: &str) -> StoreResult<Todo> {
        let key = decode_id::<RowIdCodec>(BACKEND, id)?;
        self.run("get", move |conn| {
            conn.query_row(
                "SELECT id, title, completed FROM todos WHERE id = ?1",
                params![key],
                TodoRow::read,
            )
            .optional()?
            .map(TodoRow::into_todo)
            .transpose()
        })
        .await?
        .ok_or_else(|| StoreError::not_found(id))
    }

    async fn update(&self, id: &str, update: TodoUpdate) -> StoreResult<Todo> {
        let key = decode_id::<RowIdCodec>(BACKEND, id)?;
        let completed = update.completed();
        self.run("update", move |conn| {
            conn.query_row(
                "UPDATE todos SET completed = ?1 WHERE id = ?2
                 RETURNING id, title, completed",
                params![bool_to_int(completed), key],
                TodoRow::read,
            )
            .optional()?
            .map(TodoRow::into_todo)
            .transpose()
        })
        .await?
        .ok_or_else(|| StoreError::not_found(id))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let key = decode_id::<RowIdCodec>(BACKEND, id)?;
        let changed = self
            .run("delete", move |conn| {
                Ok(conn.execute("DELETE FROM todos WHERE id = ?1", params![key])?)
            })
            .await?;
        if changed == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.run("ping", |conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}

/// Raw column values of one `todos` row.
struct TodoRow {
    id: i64,
    title: String,
    completed: i64,
}

impl TodoRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            completed: row.get("completed")?,
        })
    }

    fn into_todo(self) -> Result<Todo, BackendError> {
        let completed = match self.completed {
            0 => false,
            1 => true,
            other => {
                return Err(BackendError::InvalidData(format!(
                    "invalid completed value `{other}` in todos.completed for id {}",
                    self.id
                )));
            }
        };
        Ok(Todo {
            id: RowIdCodec::encode(&self.id),
            title: self.title,
            completed,
        })
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
