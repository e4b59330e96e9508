//! Storage core for the todo service.
//!
//! # Overview
//! Defines the `TodoStore` port that the HTTP surface calls, two adapters
//! implementing it (SQLite and MongoDB), the identifier codecs that turn
//! wire ids into backend keys, and the request validator that runs before
//! any store call.
//!
//! # Design
//! - Both adapters are interchangeable from the caller's side: same record
//!   shape, same string ids on the wire, same error classification.
//! - The backends differ on purpose in what `create` and `update` accept;
//!   `Backend` tells the validator which rules apply.
//! - Every failure is a `StoreError` with exactly one `ErrorKind`.

pub mod error;
pub mod id;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{BackendError, ErrorKind, Field, StoreError, StoreResult, ValidationError};
pub use id::{IdCodec, IdError, ObjectId, ObjectIdCodec, RowIdCodec, OBJECT_ID_HEX_LEN};
pub use store::{MongoTodoStore, SqliteTodoStore, TodoDocument, TodoStore};
pub use types::{Backend, NewTodo, Todo, TodoUpdate};
pub use validate::{validate_create, validate_update};
