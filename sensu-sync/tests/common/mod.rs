//! In-process mock Sensu backend for integration tests.
//!
//! Serves `/auth` plus the namespaced handler collection over an in-memory
//! map, enforcing authentication, and counts requests per method so tests
//! can assert how much I/O a reconciliation performed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

pub const API_KEY: &str = "8a7b2c9d-test-key";
pub const USER: &str = "admin";
pub const PASSWORD: &str = "P@ssw0rd!";
const ACCESS_TOKEN: &str = "test-access-token";

#[derive(Default)]
pub struct Counters {
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub deletes: AtomicUsize,
}

#[derive(Default)]
pub struct Backend {
    // Keyed by "{namespace}/{name}".
    objects: Mutex<HashMap<String, Value>>,
    pub counters: Counters,
}

pub struct TestServer {
    pub url: String,
    pub backend: Arc<Backend>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> TestServer {
        let port = portpicker::pick_unused_port().expect("no free port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let backend = Arc::new(Backend::default());

        let router = Router::new()
            .route("/auth", get(auth_token))
            .route(
                "/api/core/v2/namespaces/{ns}/handlers/{name}",
                get(get_object).put(put_object).delete(delete_object),
            )
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            url: format!("http://{addr}"),
            backend,
            handle,
        }
    }

    pub async fn shutdown(self) {
        self.handle.abort();
    }

    /// Place an object on the backend directly, bypassing the counters.
    pub fn seed(&self, namespace: &str, name: &str, object: Value) {
        self.backend
            .objects
            .lock()
            .unwrap()
            .insert(format!("{namespace}/{name}"), object);
    }

    /// Read an object off the backend directly, bypassing the counters.
    pub fn stored(&self, namespace: &str, name: &str) -> Option<Value> {
        self.backend
            .objects
            .lock()
            .unwrap()
            .get(&format!("{namespace}/{name}"))
            .cloned()
    }

    pub fn gets(&self) -> usize {
        self.backend.counters.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.backend.counters.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.backend.counters.deletes.load(Ordering::SeqCst)
    }

    /// Total mutating requests observed.
    pub fn mutations(&self) -> usize {
        self.puts() + self.deletes()
    }
}

async fn auth_token(headers: HeaderMap) -> Response {
    match basic_credentials(&headers) {
        Some((user, password)) if user == USER && password == PASSWORD => (
            StatusCode::OK,
            Json(json!({
                "access_token": ACCESS_TOKEN,
                "expires_at": 4102444800u64,
                "refresh_token": "test-refresh-token",
            })),
        )
            .into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value == format!("Key {API_KEY}") || value == format!("Bearer {ACCESS_TOKEN}")
        })
        .unwrap_or(false)
}

async fn get_object(
    State(backend): State<Arc<Backend>>,
    Path((namespace, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    backend.counters.gets.fetch_add(1, Ordering::SeqCst);
    let objects = backend.objects.lock().unwrap();
    match objects.get(&format!("{namespace}/{name}")) {
        Some(object) => (StatusCode::OK, Json(object.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "not found"})),
        )
            .into_response(),
    }
}

async fn put_object(
    State(backend): State<Arc<Backend>>,
    Path((namespace, name)): Path<(String, String)>,
    headers: HeaderMap,
    Json(object): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    backend.counters.puts.fetch_add(1, Ordering::SeqCst);
    backend
        .objects
        .lock()
        .unwrap()
        .insert(format!("{namespace}/{name}"), object);
    // The real backend replies 201 with an empty body.
    StatusCode::CREATED.into_response()
}

async fn delete_object(
    State(backend): State<Arc<Backend>>,
    Path((namespace, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    backend.counters.deletes.fetch_add(1, Ordering::SeqCst);
    let removed = backend
        .objects
        .lock()
        .unwrap()
        .remove(&format!("{namespace}/{name}"));
    match removed {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
