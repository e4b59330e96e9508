//! Full CRUD lifecycle over real HTTP.
//!
//! # Design
//! Starts the server on a random port with a file-backed SQLite store, then
//! drives every route with ureq, the way an external client would.

use std::sync::Arc;

use serde_json::Value;
use todo_core::{SqliteTodoStore, Todo};

struct Response {
    status: u16,
    body: String,
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Sends a request, returning 4xx/5xx responses as data rather than `Err`.
fn execute(method: &str, url: &str, body: Option<&str>) -> Response {
    let agent = agent();
    let mut response = match (method, body) {
        ("GET", _) => agent.get(url).call(),
        ("DELETE", _) => agent.delete(url).call(),
        ("POST", Some(body)) => agent
            .post(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        ("PUT", Some(body)) => agent
            .put(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (other, _) => panic!("unsupported request: {other}"),
    }
    .expect("HTTP transport error");

    Response {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

#[test]
fn crud_lifecycle() {
    // Step 1: start the server on a random port.
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteTodoStore::open(dir.path().join("todo.db")).unwrap());

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, store).await
        })
        .unwrap();
    });

    let base = format!("http://{addr}");

    // Step 2: health.
    let resp = execute("GET", &format!("{base}/health"), None);
    assert_eq!(resp.status, 200);

    // Step 3: list — should be empty.
    let resp = execute("GET", &format!("{base}/todos"), None);
    let todos: Vec<Todo> = serde_json::from_str(&resp.body).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 4: create.
    let resp = execute("POST", &format!("{base}/todos"), Some(r#"{"title":"buy milk"}"#));
    assert_eq!(resp.status, 200);
    let created: Todo = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(created.id, "1");
    assert!(!created.completed);

    // Step 5: create without a title.
    let resp = execute("POST", &format!("{base}/todos"), Some(r#"{"completed":true}"#));
    assert_eq!(resp.status, 400);
    let body: Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(body["reason"], "title_required");

    // Step 6: update completed.
    let url = format!("{base}/todos/{}", created.id);
    let resp = execute("PUT", &url, Some(r#"{"completed":true}"#));
    assert_eq!(resp.status, 200);
    let updated: Todo = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(updated.title, "buy milk");
    assert!(updated.completed);

    // Step 7: same update again — same state.
    let resp = execute("PUT", &url, Some(r#"{"completed":true}"#));
    let again: Todo = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(again, updated);

    // Step 8: get.
    let resp = execute("GET", &url, None);
    let fetched: Todo = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(fetched, updated);

    // Step 9: delete.
    let resp = execute("DELETE", &url, None);
    assert_eq!(resp.status, 204);

    // Step 10: get and delete after delete — 404.
    assert_eq!(execute("GET", &url, None).status, 404);
    assert_eq!(execute("DELETE", &url, None).status, 404);

    // Step 11: list — should be empty again.
    let resp = execute("GET", &format!("{base}/todos"), None);
    let todos: Vec<Todo> = serde_json::from_str(&resp.body).unwrap();
    assert!(todos.is_empty(), "expected empty list after delete");
}
