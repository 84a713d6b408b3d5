//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use voltguard_core::{
  asset::{Asset, AssetClass, CertStatus, GloveColor, GloveSize},
  document::CertificationDocument,
  store::AssetStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn glove(org_id: Uuid, serial: &str) -> Asset {
  Asset {
    asset_id: Uuid::new_v4(),
    org_id,
    serial_number: serial.to_string(),
    asset_class: AssetClass::Class1,
    glove_size: Some(GloveSize::Size9),
    glove_color: Some(GloveColor::Red),
    assigned_user_id: None,
    issue_date: d(2023, 6, 1),
    last_certification_date: d(2024, 1, 15),
    next_certification_date: d(2024, 7, 15),
    status: CertStatus::Active,
    failure_date: None,
    failure_reason: None,
    testing_start_date: None,
    created_at: Utc::now(),
  }
}

fn document(asset: &Asset) -> CertificationDocument {
  CertificationDocument {
    document_id: Uuid::new_v4(),
    asset_id: asset.asset_id,
    org_id: asset.org_id,
    file_name: "cert.pdf".to_string(),
    file_url: format!("docs/{}/cert.pdf", asset.asset_id),
    content_hash: "deadbeef".to_string(),
    upload_date: Utc::now(),
    uploaded_by: Uuid::new_v4(),
    applied_to_assets: vec![],
  }
}

// ─── Insert / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_roundtrip() {
  let s = store().await;
  let org = Uuid::new_v4();

  let asset = glove(org, "G-100");
  s.insert_asset(asset.clone()).await.unwrap();

  let fetched = s.get_asset(org, asset.asset_id).await.unwrap().unwrap();
  assert_eq!(fetched.serial_number, "G-100");
  assert_eq!(fetched.asset_class, AssetClass::Class1);
  assert_eq!(fetched.glove_size, Some(GloveSize::Size9));
  assert_eq!(fetched.glove_color, Some(GloveColor::Red));
  assert_eq!(fetched.status, CertStatus::Active);
  assert_eq!(fetched.next_certification_date, d(2024, 7, 15));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let result = s.get_asset(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

// ─── Tenant isolation ────────────────────────────────────────────────────────

#[tokio::test]
async fn same_serial_allowed_across_orgs() {
  let s = store().await;
  let org_a = Uuid::new_v4();
  let org_b = Uuid::new_v4();

  let a = glove(org_a, "G-100");
  let b = glove(org_b, "G-100");
  s.insert_asset(a.clone()).await.unwrap();
  s.insert_asset(b.clone()).await.unwrap();

  // Each org sees only its own row.
  assert_eq!(s.list_assets(org_a, None).await.unwrap().len(), 1);
  assert_eq!(s.list_assets(org_b, None).await.unwrap().len(), 1);
  assert!(s.get_asset(org_a, b.asset_id).await.unwrap().is_none());
  assert!(s.get_asset(org_b, a.asset_id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_serial_within_org_rejected() {
  let s = store().await;
  let org = Uuid::new_v4();

  s.insert_asset(glove(org, "G-100")).await.unwrap();
  let err = s.insert_asset(glove(org, "G-100")).await.unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateSerial(_)));
}

#[tokio::test]
async fn find_by_serial_scoped_to_org() {
  let s = store().await;
  let org_a = Uuid::new_v4();
  let org_b = Uuid::new_v4();

  s.insert_asset(glove(org_a, "G-7")).await.unwrap();

  assert!(s.find_by_serial(org_a, "G-7").await.unwrap().is_some());
  assert!(s.find_by_serial(org_b, "G-7").await.unwrap().is_none());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filtered_by_assignee() {
  let s = store().await;
  let org = Uuid::new_v4();
  let user = Uuid::new_v4();

  let mut mine = glove(org, "G-1");
  mine.assigned_user_id = Some(user);
  s.insert_asset(mine).await.unwrap();
  s.insert_asset(glove(org, "G-2")).await.unwrap();

  let all = s.list_assets(org, None).await.unwrap();
  assert_eq!(all.len(), 2);

  let assigned = s.list_assets(org, Some(user)).await.unwrap();
  assert_eq!(assigned.len(), 1);
  assert_eq!(assigned[0].serial_number, "G-1");
}

// ─── Update / delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_row() {
  let s = store().await;
  let org = Uuid::new_v4();

  let mut asset = glove(org, "G-1");
  s.insert_asset(asset.clone()).await.unwrap();

  asset.status = CertStatus::Failed;
  asset.failure_date = Some(d(2024, 3, 1));
  asset.failure_reason = Some("puncture".to_string());
  s.update_asset(asset.clone()).await.unwrap();

  let fetched = s.get_asset(org, asset.asset_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, CertStatus::Failed);
  assert_eq!(fetched.failure_reason.as_deref(), Some("puncture"));
  assert_eq!(fetched.failure_date, Some(d(2024, 3, 1)));
}

#[tokio::test]
async fn update_missing_asset_errors() {
  let s = store().await;
  let asset = glove(Uuid::new_v4(), "G-1");
  let err = s.update_asset(asset).await.unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(_)));
}

#[tokio::test]
async fn update_cannot_cross_orgs() {
  let s = store().await;
  let org = Uuid::new_v4();

  let mut asset = glove(org, "G-1");
  s.insert_asset(asset.clone()).await.unwrap();

  // Same asset id, wrong org: the write must not land.
  asset.org_id = Uuid::new_v4();
  asset.serial_number = "HIJACKED".to_string();
  let err = s.update_asset(asset.clone()).await.unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(_)));

  let fetched = s.get_asset(org, asset.asset_id).await.unwrap().unwrap();
  assert_eq!(fetched.serial_number, "G-1");
}

#[tokio::test]
async fn delete_cascades_documents() {
  let s = store().await;
  let org = Uuid::new_v4();

  let asset = glove(org, "G-1");
  s.insert_asset(asset.clone()).await.unwrap();

  let mut updated = asset.clone();
  updated.last_certification_date = d(2024, 2, 1);
  s.record_certification(updated, document(&asset)).await.unwrap();
  assert_eq!(s.list_documents(org, asset.asset_id).await.unwrap().len(), 1);

  s.delete_asset(org, asset.asset_id).await.unwrap();
  assert!(s.get_asset(org, asset.asset_id).await.unwrap().is_none());
  assert!(s.list_documents(org, asset.asset_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_asset_errors() {
  let s = store().await;
  let err = s
    .delete_asset(Uuid::new_v4(), Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(_)));
}

// ─── Certification transaction ───────────────────────────────────────────────

#[tokio::test]
async fn record_certification_writes_both_rows() {
  let s = store().await;
  let org = Uuid::new_v4();

  let asset = glove(org, "G-1");
  s.insert_asset(asset.clone()).await.unwrap();

  let mut updated = asset.clone();
  updated.last_certification_date = d(2024, 6, 1);
  updated.next_certification_date = d(2024, 12, 1);
  let doc = document(&asset);
  s.record_certification(updated, doc.clone()).await.unwrap();

  let fetched = s.get_asset(org, asset.asset_id).await.unwrap().unwrap();
  assert_eq!(fetched.last_certification_date, d(2024, 6, 1));

  let docs = s.list_documents(org, asset.asset_id).await.unwrap();
  assert_eq!(docs.len(), 1);
  assert_eq!(docs[0].document_id, doc.document_id);
  assert_eq!(docs[0].file_name, "cert.pdf");
}

#[tokio::test]
async fn record_certification_on_missing_asset_writes_nothing() {
  let s = store().await;
  let org = Uuid::new_v4();

  // Asset never inserted: the update hits zero rows, so the document
  // insert must be rolled back with it.
  let asset = glove(org, "G-1");
  let doc = document(&asset);
  let err = s
    .record_certification(asset.clone(), doc)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(_)));
  assert!(s.list_documents(org, asset.asset_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn applied_to_assets_roundtrip() {
  let s = store().await;
  let org = Uuid::new_v4();

  let asset = glove(org, "G-1");
  s.insert_asset(asset.clone()).await.unwrap();

  let batch = vec![asset.asset_id, Uuid::new_v4(), Uuid::new_v4()];
  let mut doc = document(&asset);
  doc.applied_to_assets = batch.clone();
  s.record_certification(asset.clone(), doc).await.unwrap();

  let docs = s.list_documents(org, asset.asset_id).await.unwrap();
  assert_eq!(docs[0].applied_to_assets, batch);
}

#[tokio::test]
async fn documents_ordered_by_upload_time() {
  let s = store().await;
  let org = Uuid::new_v4();

  let asset = glove(org, "G-1");
  s.insert_asset(asset.clone()).await.unwrap();

  let mut first = document(&asset);
  first.file_name = "first.pdf".to_string();
  first.upload_date = Utc::now() - chrono::Duration::hours(1);
  let mut second = document(&asset);
  second.file_name = "second.pdf".to_string();

  s.record_certification(asset.clone(), second).await.unwrap();
  s.record_certification(asset.clone(), first).await.unwrap();

  let docs = s.list_documents(org, asset.asset_id).await.unwrap();
  assert_eq!(docs[0].file_name, "first.pdf");
  assert_eq!(docs[1].file_name, "second.pdf");
}
