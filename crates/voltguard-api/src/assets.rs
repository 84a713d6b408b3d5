//! Handlers for `/assets` endpoints.
//!
//! | Method   | Path                   | Notes                              |
//! |----------|------------------------|------------------------------------|
//! | `GET`    | `/assets`              | Admin: whole org; member: assigned |
//! | `POST`   | `/assets`              | Any role; org taken from the token |
//! | `GET`    | `/assets/:id`          | 404 if not visible                 |
//! | `PATCH`  | `/assets/:id`          | Partial update                     |
//! | `DELETE` | `/assets/:id`          | Admin only                         |
//! | `POST`   | `/assets/:id/fail`     | Body: `{"reason": "..."}`          |
//! | `POST`   | `/assets/:id/testing`  |                                    |
//! | `GET`    | `/users/:id/assets`    | Member: own id only                |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use voltguard_core::{
  asset::{Asset, AssetPatch, NewAsset},
  store::AssetStore,
};
use voltguard_service::FileStorage;

use crate::{AppState, error::ApiError, token::Identified};

/// `GET /assets`
pub async fn list<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
) -> Result<Json<Vec<Asset>>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.list_assets(&caller).await?))
}

/// `POST /assets`
pub async fn create<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Json(body): Json<NewAsset>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  let asset = state.service.create_asset(&caller, body).await?;
  Ok((StatusCode::CREATED, Json(asset)))
}

/// `GET /assets/:id`
pub async fn get_one<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.get_asset(&caller, id).await?))
}

/// `PATCH /assets/:id`
pub async fn update<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
  Json(patch): Json<AssetPatch>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.update_asset(&caller, id, patch).await?))
}

/// `DELETE /assets/:id`
pub async fn delete<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  state.service.delete_asset(&caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Transitions ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FailBody {
  pub reason: Option<String>,
}

/// `POST /assets/:id/fail`
pub async fn fail<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
  body: Option<Json<FailBody>>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  let reason = body.and_then(|Json(b)| b.reason);
  Ok(Json(state.service.mark_as_failed(&caller, id, reason).await?))
}

/// `POST /assets/:id/testing`
pub async fn testing<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(id): Path<Uuid>,
) -> Result<Json<Asset>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.mark_as_in_testing(&caller, id).await?))
}

// ─── Per-user listing ────────────────────────────────────────────────────────

/// `GET /users/:user_id/assets`
pub async fn by_user<S, F>(
  State(state): State<AppState<S, F>>,
  Identified(caller): Identified,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Asset>>, ApiError>
where
  S: AssetStore + 'static,
  F: FileStorage + 'static,
{
  Ok(Json(state.service.get_assets_by_user(&caller, user_id).await?))
}
