//! Tests for the HTTP transport against a local stub server.
//!
//! The stub is an axum router on its own tokio runtime thread. It answers
//! from a queue of scripted responses and forwards every request it sees
//! over a channel.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::Router;
use docket_client::{Address, HttpTransport};
use docket_engine::{
    Client, ClientConfig, Entity, EntityState, Error, HttpRequest, Method, Model, Transport,
};
use serde_json::json;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A request as seen by the stub server.
#[derive(Debug)]
struct Captured {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct Stub {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    captured: Arc<Mutex<mpsc::Sender<Captured>>>,
}

async fn respond(
    State(stub): State<Stub>,
    method: axum::http::Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let captured = Captured {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let _ = stub.captured.lock().unwrap().send(captured);

    let (status, body) = stub
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, r#"{"error":"no scripted response left"}"#.to_string()));

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Serve `responses` in order, one per request.
fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::Receiver<Captured>) {
    let (tx, rx) = mpsc::channel();
    let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();
    let stub = Stub {
        responses: Arc::new(Mutex::new(responses.into())),
        captured: Arc::new(Mutex::new(tx)),
    };

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            addr_tx.send(listener.local_addr().unwrap()).unwrap();

            let app = Router::new().fallback(respond).with_state(stub);
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = addr_rx.recv().unwrap();
    (format!("http://{}/parse", addr), rx)
}

fn transport() -> HttpTransport {
    let inner = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    HttpTransport::from_client(inner)
}

fn client(base_url: &str) -> Client<HttpTransport> {
    Client::new(
        ClientConfig::new("app-id", "rest-key").with_base_url(base_url),
        transport(),
    )
}

#[test]
fn raw_request_round_trip() {
    let (base_url, rx) = serve(vec![(200, r#"{"ok":true}"#.to_string())]);

    let request = HttpRequest::new(Method::Put, format!("{}/classes/Address/abc", base_url))
        .with_header("X-Parse-Application-Id", "app-id")
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"price":1}"#);

    let response = transport().execute(request).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"ok":true}"#);

    let captured = rx.recv().unwrap();
    assert_eq!(captured.method, "PUT");
    assert_eq!(captured.path, "/parse/classes/Address/abc");
    assert_eq!(captured.header("x-parse-application-id"), Some("app-id"));
    assert_eq!(captured.body, r#"{"price":1}"#);
}

#[test]
fn error_status_is_not_a_transport_error() {
    let (base_url, _rx) = serve(vec![(500, r#"{"code":1,"error":"internal"}"#.to_string())]);

    let request = HttpRequest::new(Method::Get, format!("{}/classes/Address/abc", base_url));
    let response = transport().execute(request).unwrap();

    assert_eq!(response.status, 500);
    assert!(!response.is_success());
}

#[test]
fn connection_refused_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let request = HttpRequest::new(Method::Get, format!("http://{}/classes/Address", addr));
    assert!(transport().execute(request).is_err());
}

#[test]
fn address_upsert_over_http() {
    let (base_url, rx) = serve(vec![
        (
            201,
            json!({"objectId": "abc123", "createdAt": "2024-01-01T10:00:00.000Z"}).to_string(),
        ),
        (
            200,
            json!({"updatedAt": "2024-01-01T11:00:00.000Z"}).to_string(),
        ),
    ]);
    let client = client(&base_url);

    let mut address = Address::new();
    address.set_name("Test name");
    address.entity_mut().set("price", 350000);
    address.set_loc_info("zip", "75002").unwrap();
    address.save(&client).unwrap();

    let create = rx.recv().unwrap();
    assert_eq!(create.method, "POST");
    assert_eq!(create.path, "/parse/classes/Address");
    assert_eq!(create.header("X-Parse-REST-API-Key"), Some("rest-key"));
    assert_eq!(create.header("Content-Type"), Some("application/json"));
    assert_eq!(
        create.json(),
        json!({"name": "Test name", "price": 350000, "locInfos": {"zip": "75002"}})
    );
    assert_eq!(address.id(), Some("abc123"));

    address.entity_mut().set("price", 300000);
    address.save(&client).unwrap();

    let update = rx.recv().unwrap();
    assert_eq!(update.method, "PUT");
    assert_eq!(update.path, "/parse/classes/Address/abc123");
    assert_eq!(update.json(), json!({"price": 300000}));
    assert_eq!(address.entity().state(), EntityState::Clean);
}

#[test]
fn hostile_id_arrives_as_one_segment() {
    let (base_url, rx) = serve(vec![(200, "{}".to_string())]);
    let client = client(&base_url);

    let mut entity = Entity::with_id("Address", "../_User/u1?where=1");
    entity.delete(&client).unwrap();

    let delete = rx.recv().unwrap();
    assert_eq!(delete.method, "DELETE");
    assert_eq!(delete.path, "/parse/classes/Address/..%2F_User%2Fu1%3Fwhere=1");
}

#[test]
fn fetch_and_delete_over_http() {
    let (base_url, rx) = serve(vec![
        (
            200,
            json!({"objectId": "abc123", "name": "Test name", "details": {"rooms": 3}}).to_string(),
        ),
        (200, "{}".to_string()),
        (404, json!({"code": 101, "error": "object not found for get"}).to_string()),
    ]);
    let client = client(&base_url);

    let mut entity = Entity::fetch(&client, "Address", "abc123").unwrap();
    assert_eq!(rx.recv().unwrap().method, "GET");
    assert_eq!(entity.record().get_str("name"), Some("Test name"));
    assert_eq!(entity.state(), EntityState::Clean);

    entity.delete(&client).unwrap();
    let delete = rx.recv().unwrap();
    assert_eq!(delete.method, "DELETE");
    assert_eq!(delete.body, "");
    assert_eq!(entity.state(), EntityState::Deleted);

    let err = Entity::fetch(&client, "Address", "abc123").unwrap_err();
    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body.code, Some(101));
        }
        other => panic!("expected a remote error, got {:?}", other),
    }
}
