//! In-process diagnostics backend for integration tests
#![allow(dead_code)]

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
    routing::get,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Log shared between the backend and test reply sinks
pub type Events = Arc<Mutex<Vec<String>>>;

#[derive(Clone)]
pub struct Backend {
    pub events: Events,
    pub delay: Duration,
}

impl Backend {
    pub fn new(delay: Duration) -> Self {
        Self {
            events: Arc::default(),
            delay,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

fn record(backend: &Backend, path: &str, query: &HashMap<String, String>) {
    let mut pairs: Vec<_> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    backend
        .events
        .lock()
        .unwrap()
        .push(format!("backend:{path}?{}", pairs.join("&")));
}

/// `/ping` redirects to a PNG, `/curl_ping_test` fails with 500,
/// `/traceroute` answers after `delay`, `/nodes_image` answers with plain text.
pub fn router(backend: Backend) -> Router {
    Router::new()
        .route(
            "/ping",
            get(
                |State(b): State<Backend>, Query(q): Query<HashMap<String, String>>| async move {
                    record(&b, "/ping", &q);
                    Redirect::temporary("/images/ping.png")
                },
            ),
        )
        .route(
            "/curl_ping_test",
            get(
                |State(b): State<Backend>, Query(q): Query<HashMap<String, String>>| async move {
                    record(&b, "/curl_ping_test", &q);
                    (StatusCode::INTERNAL_SERVER_ERROR, "curl failed")
                },
            ),
        )
        .route(
            "/traceroute",
            get(
                |State(b): State<Backend>, Query(q): Query<HashMap<String, String>>| async move {
                    record(&b, "/traceroute", &q);
                    tokio::time::sleep(b.delay).await;
                    Redirect::temporary("/images/traceroute.png")
                },
            ),
        )
        .route(
            "/nodes_image",
            get(
                |State(b): State<Backend>, Query(q): Query<HashMap<String, String>>| async move {
                    record(&b, "/nodes_image", &q);
                    ([(header::CONTENT_TYPE, "text/plain")], "local 本机")
                },
            ),
        )
        .route(
            "/images/{name}",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "image/png")],
                    vec![0x89u8, b'P', b'N', b'G'],
                )
                    .into_response()
            }),
        )
        .with_state(backend)
}

/// Serve `router` on an ephemeral local port
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Address nothing listens on
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
