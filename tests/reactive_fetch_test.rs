use futures::channel::oneshot;
use futures::{future, stream, StreamExt, TryStreamExt};
use httpmock::prelude::*;
use serde_json::json;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use user_fetch::{ErrorCategory, FetchError, User, UserApi, UserFetchAdapter, UserStream};

// blocking client 不能在 runtime 內建立，所以 runtime 由測試自己建
fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

fn adapter_for(url: String) -> UserFetchAdapter {
    UserFetchAdapter::new(reqwest::blocking::Client::new(), url)
}

fn just(limit: i32) -> impl futures::Stream<Item = Result<i32, Infallible>> {
    stream::once(future::ready(Ok(limit)))
}

fn collect_all(users: UserStream) -> Vec<user_fetch::Result<User>> {
    runtime().block_on(users.collect::<Vec<_>>())
}

#[test]
fn test_reactive_fetch_yields_users_in_order() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/user")
            .query_param("limit", "2")
            .header("accept", "application/json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "data": [
                    {"id": 1, "name": "Ada"},
                    {"id": 2, "name": "Alan"}
                ]
            }));
    });

    let adapter = adapter_for(server.url("/api/user"));
    let users = adapter.fetch_users_reactive(just(2)).unwrap();
    let users: Vec<User> = runtime().block_on(users.try_collect()).unwrap();

    api_mock.assert();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].get("name"), Some(&json!("Ada")));
    assert_eq!(users[1].get("name"), Some(&json!("Alan")));
}

#[test]
fn test_reactive_fetch_passes_users_through_unchanged() {
    let server = MockServer::start();
    let payload = json!([
        {"id": 10, "tags": ["x"], "address": {"city": "Taipei", "zip": "100"}},
        {"id": 11, "active": false}
    ]);

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user").query_param("limit", "2");
        then.status(200).json_body(json!({ "data": payload.clone() }));
    });

    let adapter = adapter_for(server.url("/api/user"));
    let users = adapter.fetch_users_reactive(just(2)).unwrap();
    let users: Vec<User> = runtime().block_on(users.try_collect()).unwrap();

    api_mock.assert();
    assert_eq!(serde_json::to_value(&users).unwrap(), payload);
}

#[test]
fn test_reactive_fetch_empty_data() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user").query_param("limit", "5");
        then.status(200).json_body(json!({ "data": [] }));
    });

    let adapter = adapter_for(server.url("/api/user"));
    let results = collect_all(adapter.fetch_users_reactive(just(5)).unwrap());

    api_mock.assert();
    assert!(results.is_empty());
}

#[test]
fn test_reactive_fetch_non_success_status() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user");
        then.status(404);
    });

    let adapter = adapter_for(server.url("/api/user"));
    let mut results = collect_all(adapter.fetch_users_reactive(just(3)).unwrap());

    api_mock.assert();
    assert_eq!(results.len(), 1);
    let err = results.remove(0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Protocol);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[test]
fn test_reactive_fetch_missing_data_field() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user");
        then.status(200).json_body(json!({ "total": 0 }));
    });

    let adapter = adapter_for(server.url("/api/user"));
    let mut results = collect_all(adapter.fetch_users_reactive(just(3)).unwrap());

    api_mock.assert();
    assert_eq!(results.len(), 1);
    let err = results.remove(0).unwrap_err();
    assert!(matches!(err, FetchError::DeserializationError(_)));
}

#[test]
fn test_reactive_fetch_is_lazy_and_not_replayed() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user").query_param("limit", "1");
        then.status(200).json_body(json!({ "data": [{"id": 1}] }));
    });

    let adapter = adapter_for(server.url("/api/user"));

    let first = adapter.fetch_users_reactive(just(1)).unwrap();
    let second = adapter.fetch_users_reactive(just(1)).unwrap();
    assert_eq!(api_mock.hits(), 0);

    assert_eq!(collect_all(first).len(), 1);
    assert_eq!(api_mock.hits(), 1);

    assert_eq!(collect_all(second).len(), 1);
    assert_eq!(api_mock.hits(), 2);
}

#[test]
fn test_reactive_fetch_waits_for_limit_before_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user").query_param("limit", "7");
        then.status(200).json_body(json!({ "data": [{"id": 1}, {"id": 2}] }));
    });

    let emitted = Arc::new(AtomicBool::new(false));
    let (tx, rx) = oneshot::channel::<i32>();
    let sender = {
        let emitted = Arc::clone(&emitted);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            emitted.store(true, Ordering::SeqCst);
            tx.send(7).unwrap();
        })
    };

    let adapter = adapter_for(server.url("/api/user"));
    let users = adapter.fetch_users_reactive(stream::once(rx)).unwrap();

    // 呼叫回來時 limit 一定已經送出，但還沒有任何請求
    assert!(emitted.load(Ordering::SeqCst));
    assert_eq!(api_mock.hits(), 0);
    sender.join().unwrap();

    assert_eq!(collect_all(users).len(), 2);
    api_mock.assert();
}

#[test]
fn test_failed_limit_source_fails_synchronously_without_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user");
        then.status(200).json_body(json!({ "data": [] }));
    });

    let (tx, rx) = oneshot::channel::<i32>();
    drop(tx);

    let adapter = adapter_for(server.url("/api/user"));
    let err = match adapter.fetch_users_reactive(stream::once(rx)) {
        Ok(_) => panic!("expected the limit source failure"),
        Err(e) => e,
    };

    assert!(matches!(err, FetchError::LimitSourceError(_)));
    assert_eq!(err.category(), ErrorCategory::Input);
    api_mock.assert_hits(0);
}

#[test]
fn test_empty_limit_source_sends_bare_limit() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user").query_param_exists("limit");
        then.status(200).json_body(json!({ "data": [{"id": 1}] }));
    });

    let adapter = adapter_for(server.url("/api/user"));
    let users = adapter
        .fetch_users_reactive(stream::empty::<Result<i32, Infallible>>())
        .unwrap();

    assert_eq!(collect_all(users).len(), 1);
    api_mock.assert();
}

#[test]
fn test_malformed_url_surfaces_through_stream() {
    let adapter = adapter_for("not a url".to_string());

    let mut results = collect_all(adapter.fetch_users_reactive(just(3)).unwrap());

    assert_eq!(results.len(), 1);
    let err = results.remove(0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn test_unreachable_server_surfaces_through_stream() {
    let adapter = adapter_for("http://127.0.0.1:1/api/user".to_string());

    let mut results = collect_all(adapter.fetch_users_reactive(just(3)).unwrap());

    assert_eq!(results.len(), 1);
    let err = results.remove(0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
}
