//! Common fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;

use digdag_client::DigdagClient;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Start a mock server and a client pointed at it.
pub async fn setup() -> (MockServer, DigdagClient) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("digdag_client=debug")
        .try_init();

    let server = MockServer::start().await;
    let client = DigdagClient::new(&server.uri(), false).unwrap();
    (server, client)
}

pub fn project(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "revision": "5950a6c4-9df2-4b23-a50b-6e4d1e0b2b26",
        "createdAt": "2017-06-26T05:31:52Z",
        "updatedAt": "2017-06-26T05:31:52Z"
    })
}

pub fn workflow(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "project": {"id": "1", "name": "test"},
        "revision": "5950a6c4-9df2-4b23-a50b-6e4d1e0b2b26",
        "timezone": "UTC"
    })
}

pub fn session(id: &str, session_time: &str) -> Value {
    json!({
        "id": id,
        "project": {"id": "1", "name": "test"},
        "workflow": {"name": "test", "id": "2"},
        "sessionUuid": "d0b5b8e2-7c34-4f37-9b5c-3c1e1c5e3b9a",
        "sessionTime": session_time,
        "lastAttempt": {
            "id": "27",
            "retryAttemptName": null,
            "done": true,
            "success": true,
            "cancelRequested": false,
            "params": {},
            "createdAt": "2017-06-26T05:31:53Z",
            "finishedAt": "2017-06-26T05:31:55Z"
        }
    })
}

pub fn attempt(id: &str, session_time: &str) -> Value {
    json!({
        "id": id,
        "index": 1,
        "project": {"id": "1", "name": "test"},
        "workflow": {"name": "test", "id": "2"},
        "sessionId": "5",
        "sessionUuid": "d0b5b8e2-7c34-4f37-9b5c-3c1e1c5e3b9a",
        "sessionTime": session_time,
        "retryAttemptName": null,
        "done": true,
        "success": true,
        "cancelRequested": false,
        "params": {},
        "createdAt": "2017-06-26T05:31:53Z",
        "finishedAt": "2017-06-26T05:31:55Z"
    })
}

/// Three attempts: one on 2017-06-24, two on 2017-06-23.
pub fn attempts() -> Value {
    json!({
        "attempts": [
            attempt("27", "2017-06-24T00:00:00+00:00"),
            attempt("26", "2017-06-23T00:00:00+00:00"),
            attempt("25", "2017-06-23T00:00:00+00:00")
        ]
    })
}

pub fn task(id: &str, full_name: &str, state: &str) -> Value {
    let is_root = id == "1";
    let parent_id = if is_root { Value::Null } else { json!("1") };
    json!({
        "id": id,
        "fullName": full_name,
        "parentId": parent_id,
        "config": {},
        "upstreams": [],
        "state": state,
        "exportParams": {},
        "storeParams": {},
        "stateParams": {},
        "updatedAt": "2017-06-26T05:31:55Z",
        "retryAt": null,
        "startedAt": "2017-06-26T05:31:54Z",
        "isGroup": is_root
    })
}

/// Task list whose `+test+test1` task has the given state.
pub fn tasks(test1_state: &str) -> Value {
    json!({
        "tasks": [
            task("1", "+test", "success"),
            task("2", "+test+test1", test1_state),
            task("3", "+test+test2", "success")
        ]
    })
}

pub fn log_file(task_name: &str, file_name: &str) -> Value {
    json!({
        "fileName": file_name,
        "fileSize": 148,
        "taskName": task_name,
        "fileTime": "2017-06-26T05:31:55Z",
        "agentId": "12345@localhost",
        "direct": null
    })
}

pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}
