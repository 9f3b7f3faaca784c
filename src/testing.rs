//! Stand-in status API for tests

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::patch, Json, Router};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

const STATUS_PATH: &str = "/v1/service/status";

/// A PATCH received by the stand-in
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: serde_json::Value,
    pub signature: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
struct DownstreamState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
}

pub struct MockDownstream {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockDownstream {
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.addr, STATUS_PATH)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

/// Serve the status API on an ephemeral port, answering every PATCH with `status`
pub async fn spawn_downstream(status: u16) -> MockDownstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = DownstreamState {
        requests: Arc::clone(&requests),
        status: StatusCode::from_u16(status).unwrap(),
    };

    let app = Router::new()
        .route(STATUS_PATH, patch(record_update))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockDownstream { addr, requests }
}

/// An endpoint nothing listens on
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, STATUS_PATH)
}

/// An endpoint that accepts connections and never answers
pub async fn hanging_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}{}", addr, STATUS_PATH)
}

async fn record_update(
    State(state): State<DownstreamState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    state.requests.lock().push(RecordedRequest {
        body,
        signature: header("x-signature"),
        accept: header("accept"),
        content_type: header("content-type"),
    });

    state.status
}
