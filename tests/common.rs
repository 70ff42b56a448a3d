#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

pub const SERVER_START: i64 = 1_700_000_000_000;

/// In-memory stand-in for the recorder's HTTP backend.
pub struct FakeRecorder {
    pub recording_since: Mutex<i64>,
    pub record_requests: Mutex<Vec<String>>,
    pub delete_requests: Mutex<Vec<String>>,
    pub statistics_status: Mutex<StatusCode>,
    /// Added before `/record` answers.
    pub record_delay: Mutex<Duration>,
    pub files_to_delete: usize,
}

impl FakeRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            recording_since: Mutex::new(-1),
            record_requests: Mutex::new(Vec::new()),
            delete_requests: Mutex::new(Vec::new()),
            statistics_status: Mutex::new(StatusCode::OK),
            record_delay: Mutex::new(Duration::ZERO),
            files_to_delete: 3,
        })
    }
}

#[derive(Deserialize)]
struct RecordForm {
    action: String,
}

#[derive(Deserialize)]
struct DeleteForm {
    days: String,
}

async fn record(
    State(recorder): State<Arc<FakeRecorder>>,
    Form(form): Form<RecordForm>,
) -> (StatusCode, String) {
    recorder.record_requests.lock().unwrap().push(form.action.clone());
    let delay = *recorder.record_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match form.action.as_str() {
        "start" => {
            *recorder.recording_since.lock().unwrap() = SERVER_START + 60_000;
            (StatusCode::OK, "Recording...".to_string())
        }
        "stop" => {
            *recorder.recording_since.lock().unwrap() = -1;
            (StatusCode::OK, "Not Recording..".to_string())
        }
        _ => (StatusCode::BAD_REQUEST, "Invalid action".to_string()),
    }
}

async fn delete(
    State(recorder): State<Arc<FakeRecorder>>,
    Form(form): Form<DeleteForm>,
) -> (StatusCode, String) {
    recorder.delete_requests.lock().unwrap().push(form.days.clone());
    match form.days.parse::<i64>() {
        Ok(_) => (
            StatusCode::OK,
            format!("{} Files Deleted", recorder.files_to_delete),
        ),
        Err(_) => (StatusCode::BAD_REQUEST, "Error parsing days".to_string()),
    }
}

async fn statistics(State(recorder): State<Arc<FakeRecorder>>) -> (StatusCode, Json<Value>) {
    let status = *recorder.statistics_status.lock().unwrap();
    let body = json!({
        "totalSpace": 1000,
        "totalSpaceFormatted": "1000 B",
        "freeSpace": 250,
        "freeSpaceFormatted": "250 B",
        "usableSpace": 900,
        "usableSpaceFormatted": "900 B",
        "serverStartTimeMillis": SERVER_START,
        "recordingStartTimeMillis": *recorder.recording_since.lock().unwrap(),
    });
    (status, Json(body))
}

pub fn router(recorder: Arc<FakeRecorder>) -> Router {
    Router::new()
        .route("/record", post(record))
        .route("/delete", post(delete))
        .route("/statistics", get(statistics))
        .with_state(recorder)
}

/// Serves the fake recorder on an ephemeral port and returns its base URL.
pub async fn serve(recorder: Arc<FakeRecorder>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(recorder)).await.expect("serve");
    });
    format!("http://{addr}")
}
