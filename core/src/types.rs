//! Domain types shared by every storage backend.
//!
//! # Design
//! `Todo` is the record handed back to callers; its `id` is the
//! backend-rendered wire token, so callers never see a backend key type.
//! `NewTodo` and `TodoUpdate` can only be built through validating
//! constructors, which keeps an empty title from ever reaching a store.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which storage engine a `TodoStore` is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Embedded SQLite file with auto-increment integer ids.
    Relational,
    /// MongoDB collection with store-generated ObjectIds.
    Document,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Relational => "sqlite",
            Backend::Document => "mongodb",
        }
    }
}

/// A single persisted todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Validated input for `TodoStore::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
    completed: bool,
}

impl NewTodo {
    /// Rejects a title that is empty or only whitespace.
    pub fn new(title: impl Into<String>, completed: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            title: checked_title(title.into())?,
            completed,
        })
    }

    /// Shorthand for an open (not completed) item.
    pub fn titled(title: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(title, false)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Only honored by the document backend; the relational backend always
    /// creates open items.
    pub fn completed(&self) -> bool {
        self.completed
    }
}

/// Validated input for `TodoStore::update`.
///
/// Two shapes exist because the backends disagree on what an update
/// carries: the relational store changes `completed` only, the document
/// store replaces `title` and `completed` together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    title: Option<String>,
    completed: bool,
}

impl TodoUpdate {
    /// Update that sets the completion flag only.
    pub fn completion(completed: bool) -> Self {
        Self {
            title: None,
            completed,
        }
    }

    /// Update that replaces both mutable fields.
    pub fn replace(title: impl Into<String>, completed: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            title: Some(checked_title(title.into())?),
            completed,
        })
    }

    /// `None` for a completion-only update.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

fn checked_title(title: String) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title)
}
