//! End-to-end dispatch through the reqwest transport against a raw TCP
//! backend.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use restkit::client::{ClientError, Entity, Request, RestClient};
use restkit::config::ClientConfig;
use restkit::http::media_type::APPLICATION_JSON;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
}

/// Which handlers fired, in order.
#[derive(Clone, Default)]
struct Trail(Arc<Mutex<Vec<&'static str>>>);

impl Trail {
    fn request(&self, target: String) -> Request {
        let (s, n, u, f) = (self.clone(), self.clone(), self.clone(), self.clone());
        Request::builder(target)
            .on_success(move |_| s.push("success"))
            .on_not_found(move |_| n.push("not_found"))
            .on_unsuccessful(move |_| u.push("unsuccessful"))
            .on_failure(move |failure| {
                f.push(if failure.is_timeout() { "timeout" } else { "failure" })
            })
            .build()
    }

    fn push(&self, name: &'static str) -> restkit::client::HandlerResult {
        self.0.lock().unwrap().push(name);
        Ok(())
    }

    fn seen(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

fn client() -> RestClient {
    RestClient::new(&ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn test_get_entity_decodes_and_builds_url() {
    let mut backend = common::start_mock_backend(200, r#"{"id":7,"name":"ada"}"#).await;
    let trail = Trail::default();

    let request = Request::builder(backend.url())
        .path("users")
        .path("7")
        .query_param("fields", "id,name")
        .accept(APPLICATION_JSON)
        .header("X-Trace", "t-1")
        .on_success({
            let trail = trail.clone();
            move |_| trail.push("success")
        })
        .build();

    let user: Option<User> = client().get_entity(&request).await.unwrap();
    assert_eq!(user, Some(User { id: 7, name: "ada".into() }));
    assert_eq!(trail.seen(), vec!["success"]);

    let raw = backend.next_request().await.to_ascii_lowercase();
    assert!(raw.starts_with("get /users/7?fields=id%2cname http/1.1"), "{}", raw);
    assert!(raw.contains("accept: application/json\r\n"));
    assert!(raw.contains("x-trace: t-1\r\n"));
}

#[tokio::test]
async fn test_not_found_fires_both_handlers() {
    let backend = common::start_mock_backend(404, r#"{"error":"missing"}"#).await;
    let trail = Trail::default();

    let response = client().get(&trail.request(backend.url())).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(trail.seen(), vec!["not_found", "unsuccessful"]);
}

#[tokio::test]
async fn test_server_error_is_unsuccessful_only() {
    let backend = common::start_mock_backend(500, "{}").await;
    let trail = Trail::default();

    let response = client().delete(&trail.request(backend.url())).await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(trail.seen(), vec!["unsuccessful"]);
}

#[tokio::test]
async fn test_post_sends_entity() {
    let mut backend = common::start_mock_backend(201, r#"{"id":1,"name":"new"}"#).await;
    let request = Request::builder(backend.url())
        .path("users")
        .entity(Entity::json(&serde_json::json!({ "name": "new" })).unwrap())
        .build();

    let created: Option<User> = client().post_entity(&request).await.unwrap();
    assert_eq!(created.map(|u| u.id), Some(1));

    let raw = backend.next_request().await;
    assert!(raw.starts_with("POST /users HTTP/1.1"));
    assert!(raw.ends_with(r#"{"name":"new"}"#));
}

#[tokio::test]
async fn test_decode_failure_after_success() {
    let backend = common::start_mock_backend(200, "not json").await;
    let trail = Trail::default();

    let user: Option<User> = client().get_entity(&trail.request(backend.url())).await.unwrap();
    assert!(user.is_none());
    assert_eq!(trail.seen(), vec!["success", "failure"]);
}

#[tokio::test]
async fn test_connection_refused() {
    let addr = common::closed_addr().await;
    let trail = Trail::default();
    let request = trail.request(format!("http://{}", addr));

    let err = client().get(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::NoResponse(_)));

    let entity: Option<User> = client().put_entity(&request).await.unwrap();
    assert!(entity.is_none());
    assert_eq!(trail.seen(), vec!["failure", "failure"]);
}

#[tokio::test]
async fn test_timeout_becomes_408() {
    let backend = common::start_hanging_backend().await;
    let config = ClientConfig {
        request_timeout_secs: 1,
        ..ClientConfig::default()
    };
    let trail = Trail::default();

    let response = RestClient::new(&config)
        .unwrap()
        .get(&trail.request(backend.url()))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 408);
    assert_eq!(trail.seen(), vec!["timeout"]);
}

#[tokio::test]
async fn test_handler_error_propagates() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = common::start_mock_backend(503, "{}").await;

    let request = Request::builder(backend.url())
        .on_unsuccessful(|_| Err("backend unavailable".into()))
        .on_failure({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .build();

    let err = client().get(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "backend unavailable");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
