//! Handlers for certification document endpoints.
//!
//! Single upload takes the raw file in the request body with the name in
//! `?file_name=`; bulk upload is JSON with base64 content so one request
//! can certify a whole batch.

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voltguard_core::{
  Error as CoreError,
  asset::Asset,
  document::CertificationDocument,
  store::AssetStore,
};
use voltguard_service::{BulkUploadOutcome, FileStorage};

use crate::{AppState, error::ApiError, token::Identified};

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub asset:    Asset,
  pub document: CertificationDocument,
}

/// `POST /assets/:id/documents?file_name=<name>` — raw file body.
pub async fn upload<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
  Query(params): Query<UploadParams>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  if body.is_empty() {
    return Err(CoreError::Validation("empty document body".into()).into());
  }
  let (asset, document) = state
    .service
    .upload_document(&caller, id, &params.file_name, body)
    .await?;
  Ok((StatusCode::CREATED, Json(UploadResponse { asset, document })))
}

/// `GET /assets/:id/documents`
pub async fn list<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CertificationDocument>>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.list_documents(&caller, id).await?))
}

// ─── Bulk ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BulkBody {
  pub asset_ids:      Vec<Uuid>,
  pub file_name:      String,
  /// File contents, standard base64.
  pub content_base64: String,
}

/// `POST /documents/bulk`
pub async fn bulk<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Json(body): Json<BulkBody>,
) -> Result<Json<BulkUploadOutcome>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  let contents = B64
    .decode(&body.content_base64)
    .map_err(|e| CoreError::Validation(format!("invalid base64: {e}")))?;
  let outcome = state
    .service
    .bulk_upload_document(
      &caller,
      &body.asset_ids,
      &body.file_name,
      contents.into(),
    )
    .await?;
  Ok(Json(outcome))
}
