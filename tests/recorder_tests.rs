//! # Fixture Recorder Tests
//!
//! A `FakeApi` plays the real client; the recorder wrapped around it must
//! produce a configuration that replays the same traffic.

use fakeapi_core::{
    ConfigEntry, ConfigSource, FakeApi, FakeApiBuilder, FixtureRecorder, HttpVerbs, Reply, Returns, UrlConfig,
};
use serde_json::json;
use std::sync::Arc;

fn upstream() -> UrlConfig {
    [
        ("GET http://api/users?page=2", ConfigEntry::with_data(json!({"users": ["ann"]}))),
        ("POST http://api/users?name=bob", ConfigEntry::with_data(json!({"id": 2})).status(201)),
        ("DELETE http://api/users/2", ConfigEntry::default().status(204)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_recorder_forwards_and_records() {
    let real = Arc::new(FakeApi::new(upstream()));
    let recorder = FixtureRecorder::new(Arc::clone(&real));

    let reply = recorder.get("http://api/users", Some(&json!({"page": 2}))).unwrap();
    assert_eq!(reply.data(), &json!({"users": ["ann"]}));
    recorder.post("http://api/users", Some(&json!({"name": "bob"})), None).unwrap();
    recorder.delete("http://api/users/2").unwrap();

    assert_eq!(real.url_history().len(), 3, "Every call reaches the wrapped client");

    let recorded = recorder.url_config();
    assert_eq!(recorded.len(), 3);

    let get = recorded.get("GET http://api/users?page=2").unwrap();
    assert_eq!(get.status_code, Some(200));
    assert_eq!(get.data, Some(json!({"users": ["ann"]})));
    assert_eq!(get.payload, None);

    let post = recorded.get("POST http://api/users?name=bob").unwrap();
    assert_eq!(post.status_code, Some(201));
    assert_eq!(post.payload, Some(json!({"name": "bob"})));

    let delete = recorded.get("DELETE http://api/users/2").unwrap();
    assert_eq!(delete.status_code, Some(204));
    assert_eq!(delete.data, Some(json!(null)), "Empty body is recorded as null");
}

/// Saved fixtures load back into a fresh engine and answer the same calls.
#[test]
fn test_saved_fixtures_replay() {
    let recorder = FixtureRecorder::new(FakeApi::new(upstream()));
    recorder.get("http://api/users", Some(&json!({"page": 2}))).unwrap();
    recorder.post("http://api/users", Some(&json!({"name": "bob"})), None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixtures.json");
    recorder.save(&path).unwrap();

    let replay = FakeApi::default();
    replay.load_config(&ConfigSource::Path(path)).unwrap();

    let reply = replay.get("http://api/users", Some(&json!({"page": 2}))).unwrap();
    assert_eq!(reply.data(), &json!({"users": ["ann"]}));

    let created = replay
        .post("http://api/users", Some(&json!({"name": "bob"})), None)
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(created.status_code, 201);
    assert_eq!(created.data, json!({"id": 2}));
}

/// A client answering bodies only gives no URL or status back; the request
/// itself is used to build the key.
#[test]
fn test_recorder_with_data_only_client() {
    let real = FakeApiBuilder::new()
        .with_config(upstream())
        .with_returns(Returns::Data)
        .build();
    let recorder = FixtureRecorder::new(real);

    let reply = recorder.get("http://api/users", Some(&json!({"page": 2}))).unwrap();
    assert!(matches!(reply, Reply::Data(_)));

    let recorded = recorder.url_config();
    let entry = recorded.get("GET http://api/users?page=2").unwrap();
    assert_eq!(entry.status_code, None);
    assert_eq!(entry.data, Some(json!({"users": ["ann"]})));

    let real = recorder.into_inner();
    assert_eq!(real.url_history(), vec!["GET http://api/users?page=2".to_string()]);
}
