//! Router-level tests driven through `tower::ServiceExt::oneshot`, with
//! the clock pinned to 2024-06-01.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;
use voltguard_core::{
  Result,
  authz::OrgRolePolicy,
  identity::{Caller, OrgRole},
};
use voltguard_service::{
  AssetService, FileStorage, FixedClock, StoredFile, files::content_hash,
};
use voltguard_store_sqlite::SqliteStore;

use crate::{AppState, TokenVerifier, router};

struct MemoryFiles;

impl FileStorage for MemoryFiles {
  async fn put(
    &self,
    org_id: Uuid,
    asset_id: Uuid,
    file_name: &str,
    contents: &[u8],
  ) -> Result<StoredFile> {
    Ok(StoredFile {
      file_url:     format!("mem/{org_id}/{asset_id}/{file_name}"),
      content_hash: content_hash(contents),
    })
  }
}

type TestState = AppState<SqliteStore, MemoryFiles>;

async fn make_state() -> TestState {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let clock = FixedClock("2024-06-01T12:00:00Z".parse().unwrap());
  let service = AssetService::new(
    store,
    MemoryFiles,
    Box::new(OrgRolePolicy),
    Box::new(clock),
  );
  AppState {
    service:  Arc::new(service),
    verifier: Arc::new(TokenVerifier::new("test-secret")),
  }
}

fn admin(org_id: Uuid) -> Caller {
  Caller { user_id: Uuid::new_v4(), org_id, role: OrgRole::Admin }
}

fn member(org_id: Uuid) -> Caller {
  Caller { user_id: Uuid::new_v4(), org_id, role: OrgRole::Member }
}

async fn oneshot_raw(
  state: TestState,
  caller: Option<&Caller>,
  method: &str,
  uri: &str,
  content_type: Option<&str>,
  body: &str,
) -> axum::response::Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(caller) = caller {
    let token = state.verifier.issue(caller);
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  if let Some(ct) = content_type {
    builder = builder.header(header::CONTENT_TYPE, ct);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn oneshot_json(
  state: TestState,
  caller: &Caller,
  method: &str,
  uri: &str,
  body: Value,
) -> axum::response::Response {
  oneshot_raw(
    state,
    Some(caller),
    method,
    uri,
    Some("application/json"),
    &body.to_string(),
  )
  .await
}

async fn body_json(resp: axum::response::Response) -> Value {
  let bytes =
    axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn new_asset_body(serial: &str) -> Value {
  json!({
    "serial_number": serial,
    "asset_class": "class_1",
    "last_certification_date": "2024-03-01",
  })
}

async fn create_asset(
  state: &TestState,
  caller: &Caller,
  serial: &str,
) -> Value {
  let resp = oneshot_json(
    state.clone(),
    caller,
    "POST",
    "/assets",
    new_asset_body(serial),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthenticated_requests_return_401() {
  let state = make_state().await;
  let resp = oneshot_raw(state, None, "GET", "/assets", None, "").await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn forged_token_returns_401() {
  let state = make_state().await;
  let forged = TokenVerifier::new("wrong-secret")
    .issue(&admin(Uuid::new_v4()));
  let req = Request::builder()
    .method("GET")
    .uri("/assets")
    .header(header::AUTHORIZATION, format!("Bearer {forged}"))
    .body(Body::empty())
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ─── Assets ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_roundtrip() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  let created = create_asset(&state, &adm, "G-100").await;
  assert_eq!(created["status"], "active");
  assert_eq!(created["next_certification_date"], "2024-09-01");

  let id = created["asset_id"].as_str().unwrap();
  let resp = oneshot_raw(
    state,
    Some(&adm),
    "GET",
    &format!("/assets/{id}"),
    None,
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let fetched = body_json(resp).await;
  assert_eq!(fetched["serial_number"], "G-100");
}

#[tokio::test]
async fn duplicate_serial_returns_400() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  create_asset(&state, &adm, "G-100").await;
  let resp = oneshot_json(
    state,
    &adm,
    "POST",
    "/assets",
    new_asset_body("G-100"),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn future_certification_date_returns_400() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());
  let resp = oneshot_json(
    state,
    &adm,
    "POST",
    "/assets",
    json!({
      "serial_number": "G-1",
      "asset_class": "class_1",
      "last_certification_date": "2024-06-02",
    }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unassigned_asset_returns_404_for_member() {
  let state = make_state().await;
  let org = Uuid::new_v4();
  let adm = admin(org);
  let mbr = member(org);

  let created = create_asset(&state, &adm, "G-1").await;
  let id = created["asset_id"].as_str().unwrap();

  let resp = oneshot_raw(
    state,
    Some(&mbr),
    "GET",
    &format!("/assets/{id}"),
    None,
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_and_delete_removes() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  let created = create_asset(&state, &adm, "G-1").await;
  let id = created["asset_id"].as_str().unwrap().to_string();

  let resp = oneshot_json(
    state.clone(),
    &adm,
    "PATCH",
    &format!("/assets/{id}"),
    json!({ "glove_color": "yellow" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["glove_color"], "yellow");

  let resp = oneshot_raw(
    state.clone(),
    Some(&adm),
    "DELETE",
    &format!("/assets/{id}"),
    None,
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = oneshot_raw(
    state,
    Some(&adm),
    "GET",
    &format!("/assets/{id}"),
    None,
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Transitions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn double_fail_returns_409() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  let created = create_asset(&state, &adm, "G-1").await;
  let id = created["asset_id"].as_str().unwrap().to_string();

  let resp = oneshot_json(
    state.clone(),
    &adm,
    "POST",
    &format!("/assets/{id}/fail"),
    json!({ "reason": "puncture" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["status"], "failed");

  let resp = oneshot_json(
    state,
    &adm,
    "POST",
    &format!("/assets/{id}/fail"),
    json!({ "reason": "again" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_document_restarts_cycle() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  let created = create_asset(&state, &adm, "G-1").await;
  let id = created["asset_id"].as_str().unwrap().to_string();

  let resp = oneshot_raw(
    state.clone(),
    Some(&adm),
    "POST",
    &format!("/assets/{id}/documents?file_name=cert.pdf"),
    Some("application/pdf"),
    "pdf-bytes",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let uploaded = body_json(resp).await;
  assert_eq!(uploaded["asset"]["last_certification_date"], "2024-06-01");
  assert_eq!(uploaded["asset"]["next_certification_date"], "2024-12-01");
  assert_eq!(uploaded["document"]["file_name"], "cert.pdf");

  let resp = oneshot_raw(
    state,
    Some(&adm),
    "GET",
    &format!("/assets/{id}/documents"),
    None,
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let docs = body_json(resp).await;
  assert_eq!(docs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bulk_upload_reports_outcome() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  let a = create_asset(&state, &adm, "G-1").await;
  let b = create_asset(&state, &adm, "G-2").await;
  let missing = Uuid::new_v4();

  let resp = oneshot_json(
    state,
    &adm,
    "POST",
    "/documents/bulk",
    json!({
      "asset_ids": [a["asset_id"], b["asset_id"], missing],
      "file_name": "batch.pdf",
      "content_base64": "cGRmLWJ5dGVz",
    }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let outcome = body_json(resp).await;
  assert_eq!(outcome["applied"].as_array().unwrap().len(), 2);
  assert_eq!(outcome["failed"].as_array().unwrap().len(), 1);
}

// ─── Bulk transfer ───────────────────────────────────────────────────────────

#[tokio::test]
async fn import_then_export() {
  let state = make_state().await;
  let adm = admin(Uuid::new_v4());

  let csv = "serial_number,asset_class,last_certification_date\n\
             G-1,Class 1,2024-03-01\n\
             G-2,Class 0,bad-date\n";
  let resp = oneshot_raw(
    state.clone(),
    Some(&adm),
    "POST",
    "/import",
    Some("text/csv"),
    csv,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let outcome = body_json(resp).await;
  assert_eq!(outcome["created"], 1);
  assert_eq!(outcome["errors"].as_array().unwrap().len(), 1);
  assert_eq!(outcome["errors"][0]["line"], 3);

  let resp =
    oneshot_raw(state, Some(&adm), "GET", "/export", None, "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let ct = resp
    .headers()
    .get(header::CONTENT_TYPE)
    .unwrap()
    .to_str()
    .unwrap();
  assert!(ct.contains("text/csv"), "Content-Type: {ct}");
  let bytes =
    axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = std::str::from_utf8(&bytes).unwrap();
  assert!(body.starts_with("serial_number,asset_class,"));
  assert!(body.contains("G-1"));
}
