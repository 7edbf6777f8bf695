use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use server::{
    config::{Config, CredentialSource},
    sheets::SheetsStore,
    store::{CatalogStore, OrderStore, StoreError},
};
use tokio::{net::TcpListener, sync::Mutex};

const PRIVATE_KEY: &str = include_str!("fixtures/service-account.pem");
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug)]
struct Append {
    range: String,
    query: HashMap<String, String>,
    body: Value,
}

#[derive(Default)]
struct Sheets {
    token_requests: AtomicUsize,
    appends: Mutex<Vec<Append>>,
}

async fn token(State(sheets): State<Arc<Sheets>>, Form(form): Form<HashMap<String, String>>) -> Response {
    sheets.token_requests.fetch_add(1, Ordering::SeqCst);

    let signed = form
        .get("assertion")
        .is_some_and(|jwt| jwt.split('.').count() == 3);

    if form.get("grant_type").map(String::as_str) != Some(GRANT_TYPE) || !signed {
        return StatusCode::BAD_REQUEST.into_response();
    }

    Json(json!({ "access_token": "test-token", "expires_in": 3600 })).into_response()
}

async fn values(Path((_, range)): Path<(String, String)>) -> Response {
    if range.starts_with("Missing") {
        return (StatusCode::NOT_FOUND, "Unable to parse range").into_response();
    }

    Json(json!({
        "range": range,
        "values": [["Tubs", "1", "10%"], ["Bulk", 5]],
    }))
    .into_response()
}

async fn append(
    State(sheets): State<Arc<Sheets>>,
    Path((_, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    sheets.appends.lock().await.push(Append { range, query, body });

    StatusCode::OK
}

async fn serve(sheets: Arc<Sheets>) -> SocketAddr {
    let app = Router::new()
        .route("/token", post(token))
        .route(
            "/v4/spreadsheets/{id}/values/{range}",
            get(values).post(append),
        )
        .with_state(sheets);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn store(addr: SocketAddr) -> SheetsStore {
    let config = Config {
        spreadsheet_id: "sheet".to_string(),
        credentials: CredentialSource::Inline(
            json!({
                "client_email": "orders@food.iam.gserviceaccount.com",
                "private_key": PRIVATE_KEY,
            })
            .to_string(),
        ),
        sheets_api_url: format!("http://{addr}"),
        token_url: Some(format!("http://{addr}/token")),
        ..Default::default()
    };

    SheetsStore::new(&config).unwrap()
}

#[tokio::test]
async fn test_token_reused_across_reads() {
    let sheets = Arc::new(Sheets::default());
    let store = store(serve(sheets.clone()).await);

    let first = store.read("Packages!A2:C").await.unwrap();
    let second = store.read("Packages!A2:C").await.unwrap();

    assert_eq!(first, vec![vec!["Tubs", "1", "10%"], vec!["Bulk", "5"]]);
    assert_eq!(first, second);
    assert_eq!(sheets.token_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_append_request() {
    let sheets = Arc::new(Sheets::default());
    let store = store(serve(sheets.clone()).await);

    let row: Vec<String> = ["10/17/2026", "5551234567", "Rex Owner"]
        .map(String::from)
        .to_vec();

    store.append("Orders!A2:J", row.clone()).await.unwrap();

    let appends = sheets.appends.lock().await;
    assert_eq!(appends.len(), 1);

    let append = &appends[0];
    assert_eq!(append.range, "Orders!A2:J:append");
    assert_eq!(append.query.get("valueInputOption").map(String::as_str), Some("USER_ENTERED"));
    assert_eq!(append.query.get("insertDataOption").map(String::as_str), Some("INSERT_ROWS"));
    assert_eq!(append.body, json!({ "values": [row] }));
}

#[tokio::test]
async fn test_error_status() {
    let sheets = Arc::new(Sheets::default());
    let store = store(serve(sheets).await);

    let err = store.read("Missing!A2:C").await.unwrap_err();

    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, "Unable to parse range");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
