use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use records::{
    Credentials, ExactMatchFilter, FetchParams, RecordApi, RecordClient, RecordExt, RecordsError,
    Table, PROJECT_ID_HEADER, PUBLIC_KEY_HEADER,
};
use serde_json::{json, Value};

/// A request the fake record API saw.
#[derive(Debug, Clone)]
struct Seen {
    path: String,
    project_id: Option<String>,
    public_key: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeState {
    fn record(&self, path: String, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.seen.lock().unwrap().push(Seen {
            path,
            project_id: header(PROJECT_ID_HEADER),
            public_key: header(PUBLIC_KEY_HEADER),
            authorization: header("authorization"),
            body,
        });
    }

    fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

async fn query(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(format!("/tables/{table}/records/query"), &headers, body);
    match table.as_str() {
        "client" => Json(json!({
            "success": true,
            "data": [{"Id": 1, "Name": "Acme"}, {"Id": 2, "Name": "Globex"}]
        }))
        .into_response(),
        "project2" => Json(json!({"success": false, "message": "Invalid field: colour"}))
            .into_response(),
        "tag" => (StatusCode::FORBIDDEN, "nope").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn by_id(
    State(state): State<FakeState>,
    Path((table, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    state.record(format!("/tables/{table}/records/{id}"), &headers, Value::Null);
    if id == 7 {
        Json(json!({"success": true, "data": {"Id": 7, "Name": "Seven"}})).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn create(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let results: Vec<Value> = body["records"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, mut r)| {
            r["Id"] = json!(100 + i);
            json!({"success": true, "data": r})
        })
        .collect();
    state.record(format!("/tables/{table}/records"), &headers, body);
    Json(json!({"success": true, "results": results}))
}

async fn update(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(format!("/tables/{table}/records"), &headers, body);
    Json(json!({
        "success": true,
        "results": [{"success": false, "message": "Record 5 not found"}]
    }))
}

async fn delete(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(format!("/tables/{table}/records"), &headers, body);
    Json(json!({"success": true, "results": [{"success": true}, {"success": true}]}))
}

async fn me(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.record("/auth/me".to_string(), &headers, Value::Null);
    if headers.get("authorization").is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "success": true,
        "data": {"userId": 3, "firstName": "Ada", "lastName": "Byron", "emailAddress": "ada@example.com"}
    }))
    .into_response()
}

async fn spawn_fake_api() -> (SocketAddr, FakeState) {
    let state = FakeState::default();
    let app = Router::new()
        .route("/tables/:table/records/query", post(query))
        .route(
            "/tables/:table/records",
            post(create).put(update).delete(delete),
        )
        .route("/tables/:table/records/:id", get(by_id))
        .route("/auth/me", get(me))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn client(addr: SocketAddr, session: Option<&str>) -> RecordClient {
    let mut credentials = Credentials::new("proj-1", "pk-1");
    if let Some(token) = session {
        credentials = credentials.with_session(token);
    }
    RecordClient::new(&format!("http://{addr}"), credentials).unwrap()
}

#[tokio::test]
async fn fetch_sends_credentials_and_params() {
    let (addr, state) = spawn_fake_api().await;
    let api = client(addr, Some("tok"));

    let params =
        FetchParams::paged(1, 20).with_filter(&ExactMatchFilter::new().with("Name", "Acme"));
    let rows = api.fetch_records(Table::Client, &params).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].str_field("Name"), Some("Globex"));

    let seen = state.last();
    assert_eq!(seen.path, "/tables/client/records/query");
    assert_eq!(seen.project_id.as_deref(), Some("proj-1"));
    assert_eq!(seen.public_key.as_deref(), Some("pk-1"));
    assert_eq!(seen.authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(seen.body["pagingInfo"], json!({"limit": 20, "offset": 0}));
    assert_eq!(seen.body["where"][0]["fieldName"], "Name");
}

#[tokio::test]
async fn unsuccessful_envelope_becomes_rejected() {
    let (addr, _) = spawn_fake_api().await;
    let api = client(addr, None);

    let err = api
        .fetch_records(Table::Project, &FetchParams::all())
        .await
        .unwrap_err();
    match err {
        RecordsError::Rejected(msg) => assert_eq!(msg, "Invalid field: colour"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn forbidden_maps_to_unauthorized() {
    let (addr, _) = spawn_fake_api().await;
    let api = client(addr, None);

    let err = api
        .fetch_records(Table::Tag, &FetchParams::all())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn server_errors_map_to_request_errors() {
    let (addr, _) = spawn_fake_api().await;
    let api = client(addr, None);

    let err = api
        .fetch_records(Table::TimeEntry, &FetchParams::all())
        .await
        .unwrap_err();
    assert!(matches!(err, RecordsError::Request(_)));
}

#[tokio::test]
async fn get_by_id_treats_404_as_missing() {
    let (addr, _) = spawn_fake_api().await;
    let api = client(addr, None);

    let found = api.get_record_by_id(Table::Project, 7).await.unwrap();
    assert_eq!(found.and_then(|r| r.id()), Some(7));

    let missing = api.get_record_by_id(Table::Project, 8).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn create_wraps_records_and_returns_results() {
    let (addr, state) = spawn_fake_api().await;
    let api = client(addr, None);

    let row = json!({"Name": "rust", "project": 4})
        .as_object()
        .cloned()
        .unwrap();
    let results = api.create_records(Table::Tag, vec![row]).await.unwrap();

    assert!(results[0].success);
    assert_eq!(results[0].data.as_ref().and_then(|d| d.id()), Some(100));
    assert_eq!(state.last().body["records"][0]["Name"], "rust");
}

#[tokio::test]
async fn update_surfaces_per_record_failures() {
    let (addr, _) = spawn_fake_api().await;
    let api = client(addr, None);

    let row = json!({"Id": 5, "Name": "x"}).as_object().cloned().unwrap();
    let results = api.update_records(Table::Client, vec![row]).await.unwrap();

    assert!(!results[0].success);
    assert_eq!(results[0].message.as_deref(), Some("Record 5 not found"));
}

#[tokio::test]
async fn delete_sends_record_ids() {
    let (addr, state) = spawn_fake_api().await;
    let api = client(addr, None);

    assert!(api.delete_records(Table::Attachment, &[3, 4]).await.unwrap());
    let seen = state.last();
    assert_eq!(seen.path, "/tables/Attachment1/records");
    assert_eq!(seen.body, json!({"RecordIds": [3, 4]}));
}

#[tokio::test]
async fn current_user_requires_a_session() {
    let (addr, _) = spawn_fake_api().await;

    let err = client(addr, None).current_user().await.unwrap_err();
    assert!(err.is_unauthorized());

    let user = client(addr, Some("tok"))
        .current_user()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.display_name(), "Ada Byron");
    assert_eq!(user.email_address, "ada@example.com");
}
