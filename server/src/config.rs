//! Command-line and environment configuration.

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use todo_core::{BackendError, MongoTodoStore, SqliteTodoStore};

use crate::SharedStore;

/// Storage engine selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Sqlite,
    Mongodb,
}

/// Todo HTTP service.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version)]
pub struct Config {
    /// Storage backend.
    #[arg(long, env = "TODO_BACKEND", value_enum, default_value_t = BackendKind::Sqlite)]
    pub backend: BackendKind,

    /// SQLite database file.
    #[arg(long, env = "TODO_SQLITE_PATH", default_value = "todo.db")]
    pub sqlite_path: String,

    #[arg(long, env = "TODO_MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    #[arg(long, env = "TODO_MONGODB_DATABASE", default_value = "todo")]
    pub mongodb_database: String,

    #[arg(long, env = "TODO_MONGODB_COLLECTION", default_value = "todos")]
    pub mongodb_collection: String,

    /// Address to bind.
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "TODO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TODO_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Opens the configured backend. The returned handle is the only one
    /// the process uses.
    pub async fn open_store(&self) -> Result<SharedStore, BackendError> {
        let store: SharedStore = match self.backend {
            BackendKind::Sqlite => Arc::new(SqliteTodoStore::open(&self.sqlite_path)?),
            BackendKind::Mongodb => Arc::new(
                MongoTodoStore::connect(
                    &self.mongodb_uri,
                    &self.mongodb_database,
                    &self.mongodb_collection,
                )
                .await?,
            ),
        };
        Ok(store)
    }
}
