//! Fixtures shared by unit tests: a seeded workbook and a throwaway webhook receiver.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, time::sleep};

use crate::dao::{
    models::{CellRef, CellValue, col},
    sheet_store::{MemorySheetStore, SheetStore},
};

/// Workbook holding one game with balances 500 / 300 and no tickets.
pub async fn carnival_store(game: &str) -> MemorySheetStore {
    let store = MemorySheetStore::new();
    store
        .insert_sheet(
            game,
            [
                (CellRef::new(col::A, 3), CellValue::Number(500.0)),
                (CellRef::new(col::B, 3), CellValue::Number(300.0)),
            ],
        )
        .await;
    store
}

/// Current value of an A1 cell.
pub async fn cell_value(store: &MemorySheetStore, game: &str, address: &str) -> CellValue {
    store
        .read_cell(game, address.parse().unwrap())
        .await
        .unwrap()
}

/// One request captured by the receiver.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ReceiverState {
    status: StatusCode,
    delay: Duration,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Local stand-in for the dashboard's webhook endpoints.
pub struct Receiver {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Receiver {
    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a receiver that records every webhook and answers with `status`.
pub async fn spawn_receiver(status: StatusCode) -> Receiver {
    spawn_delayed_receiver(status, Duration::ZERO).await
}

/// Like [`spawn_receiver`], but each answer is held back for `delay`.
pub async fn spawn_delayed_receiver(status: StatusCode, delay: Duration) -> Receiver {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ReceiverState {
        status,
        delay,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/webhook/{kind}", post(capture))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Receiver {
        base_url: format!("http://{addr}"),
        requests,
    }
}

async fn capture(
    State(state): State<ReceiverState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(CapturedRequest {
        path: format!("/webhook/{kind}"),
        content_type,
        body,
    });
    if !state.delay.is_zero() {
        sleep(state.delay).await;
    }
    (state.status, Json(json!({ "status": "received" })))
}

/// Base URL of a local port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
