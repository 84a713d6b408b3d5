//! CSV bulk transfer endpoints.

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use voltguard_core::store::AssetStore;
use voltguard_service::{FileStorage, ImportOutcome};

use crate::{AppState, error::ApiError, token::Identified};

/// `POST /import` — CSV text body. Returns the per-line outcome; 200 even
/// when some rows failed.
pub async fn import<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  body: String,
) -> Result<Json<ImportOutcome>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.import_csv(&caller, &body).await?))
}

/// `GET /export` — the caller's visible assets as CSV.
pub async fn export<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
) -> Result<impl IntoResponse, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  let csv = state.service.export_csv(&caller).await?;
  Ok((
    StatusCode::OK,
    [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
    csv,
  ))
}
