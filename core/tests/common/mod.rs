//! Storage port properties shared by every backend's test suite.
//!
//! Each function takes a store that starts empty and asserts one property
//! of the `TodoStore` contract. Backend-specific suites call all of them.

#![allow(dead_code)]

use todo_core::{Backend, ErrorKind, NewTodo, TodoStore, TodoUpdate};

/// Builds the update shape `store` accepts.
pub fn update_for(store: &dyn TodoStore, title: &str, completed: bool) -> TodoUpdate {
    match store.backend() {
        Backend::Relational => TodoUpdate::completion(completed),
        Backend::Document => TodoUpdate::replace(title, completed).unwrap(),
    }
}

pub async fn empty_store_lists_nothing(store: &dyn TodoStore) {
    let todos = store.list().await.unwrap();
    assert!(todos.is_empty(), "expected empty list, got {todos:?}");
}

pub async fn create_then_get_roundtrips(store: &dyn TodoStore) {
    for title in ["buy milk", "  spaced  ", "ünïcødé ✓", "'; DROP TABLE todos; --"] {
        let created = store.create(NewTodo::titled(title).unwrap()).await.unwrap();
        assert_eq!(created.title, title);
        assert!(!created.completed);

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }
    assert_eq!(store.list().await.unwrap().len(), 4);
}

pub async fn ids_are_unique(store: &dyn TodoStore) {
    let mut ids = Vec::new();
    for n in 0..5 {
        let todo = store
            .create(NewTodo::titled(format!("item {n}")).unwrap())
            .await
            .unwrap();
        assert!(!ids.contains(&todo.id), "duplicate id {}", todo.id);
        ids.push(todo.id);
    }
}

pub async fn unknown_ids_are_not_found(store: &dyn TodoStore, unknown: &str) {
    for id in [unknown, "", "not-an-id", "-1", "../todos"] {
        let err = store.get(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "get {id:?}");

        let err = store
            .update(id, update_for(store, "x", true))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "update {id:?}");

        let err = store.delete(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "delete {id:?}");
    }
}

pub async fn update_replaces_and_is_idempotent(store: &dyn TodoStore) {
    let created = store
        .create(NewTodo::titled("write report").unwrap())
        .await
        .unwrap();

    let update = update_for(store, "write report v2", true);
    let once = store.update(&created.id, update.clone()).await.unwrap();
    let twice = store.update(&created.id, update).await.unwrap();
    assert_eq!(once, twice);
    assert!(twice.completed);
    assert_eq!(store.get(&created.id).await.unwrap(), twice);

    let reopened = store
        .update(&created.id, update_for(store, "write report v2", false))
        .await
        .unwrap();
    assert!(!reopened.completed);
}

pub async fn delete_is_terminal(store: &dyn TodoStore) {
    let keep = store.create(NewTodo::titled("keep").unwrap()).await.unwrap();
    let gone = store.create(NewTodo::titled("gone").unwrap()).await.unwrap();

    store.delete(&gone.id).await.unwrap();

    let err = store.get(&gone.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = store.delete(&gone.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = store
        .update(&gone.id, update_for(store, "back", true))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let remaining = store.list().await.unwrap();
    assert_eq!(remaining, vec![keep]);
}

pub async fn ping_succeeds(store: &dyn TodoStore) {
    store.ping().await.unwrap();
}
