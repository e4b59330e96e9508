//! Request payload checks that run before any storage call.
//!
//! The body is parsed as JSON first, then checked for an object shape, then
//! per field. Which fields are required depends on the backend: the
//! relational variant updates `completed` only, while the document variant
//! takes `title` and `completed` together and lets `create` set
//! `completed` up front.

use serde_json::{Map, Value};

use crate::error::{Field, ValidationError};
use crate::types::{Backend, NewTodo, TodoUpdate};

type Fields = Map<String, Value>;

/// Validates a create payload for `backend`.
pub fn validate_create(backend: Backend, body: &[u8]) -> Result<NewTodo, ValidationError> {
    let fields = parse_object(body)?;
    let title = required_string(&fields, Field::Title)?;
    let completed = match backend {
        Backend::Relational => false,
        Backend::Document => optional_bool(&fields, Field::Completed)?.unwrap_or(false),
    };
    NewTodo::new(title, completed)
}

/// Validates an update payload for `backend`.
pub fn validate_update(backend: Backend, body: &[u8]) -> Result<TodoUpdate, ValidationError> {
    let fields = parse_object(body)?;
    match backend {
        Backend::Relational => {
            let completed = required_bool(&fields, Field::Completed)?;
            Ok(TodoUpdate::completion(completed))
        }
        Backend::Document => {
            let title = required_string(&fields, Field::Title)?;
            let completed = required_bool(&fields, Field::Completed)?;
            TodoUpdate::replace(title, completed)
        }
    }
}

fn parse_object(body: &[u8]) -> Result<Fields, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ValidationError::BodyNotObject),
        Err(_) => Err(ValidationError::InvalidJson),
    }
}

// An explicit `null` counts as absent.
fn field<'a>(fields: &'a Fields, name: Field) -> Option<&'a Value> {
    fields.get(name.as_str()).filter(|value| !value.is_null())
}

fn required_string(fields: &Fields, name: Field) -> Result<String, ValidationError> {
    match field(fields, name) {
        None => Err(ValidationError::MissingField(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::WrongType {
            field: name,
            expected: "string",
        }),
    }
}

fn optional_bool(fields: &Fields, name: Field) -> Result<Option<bool>, ValidationError> {
    match field(fields, name) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::WrongType {
            field: name,
            expected: "boolean",
        }),
    }
}

fn required_bool(fields: &Fields, name: Field) -> Result<bool, ValidationError> {
    optional_bool(fields, name)?.ok_or(ValidationError::MissingField(name))
}
