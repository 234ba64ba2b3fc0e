//! Handlers for observatories, telescopes and pictures.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/insert-observatory` | Body: [`NewObservatory`]; 201 |
//! | `POST` | `/insert-telescope` | Body: [`NewTelescope`]; 201 |
//! | `POST` | `/insert-picture` | Body: [`NewPicture`]; 201 |
//! | `POST` | `/search-observatories-telescopes` | Body: `{"tel_name": "..."}` |

use std::sync::Arc;

use astrodb_core::{
  facility::{NewObservatory, NewPicture, NewTelescope},
  store::ObservationStore,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{Data, JsonBody, data, error::ApiError, success};

/// `POST /insert-observatory`
pub async fn insert_observatory<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(observatory): JsonBody<NewObservatory>,
) -> Result<impl IntoResponse, ApiError> {
  store
    .insert_observatory(observatory)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, success()))
}

/// `POST /insert-telescope`
pub async fn insert_telescope<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(telescope): JsonBody<NewTelescope>,
) -> Result<impl IntoResponse, ApiError> {
  store
    .insert_telescope(telescope)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, success()))
}

/// `POST /insert-picture`
pub async fn insert_picture<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(picture): JsonBody<NewPicture>,
) -> Result<impl IntoResponse, ApiError> {
  store
    .insert_picture(picture)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, success()))
}

#[derive(Debug, Deserialize)]
pub struct TelescopeBody {
  pub tel_name: String,
}

#[derive(Debug, Serialize)]
pub struct ObservatoryName {
  pub obs_name: String,
}

/// `POST /search-observatories-telescopes`
pub async fn search_by_telescope<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<TelescopeBody>,
) -> Result<Json<Data<Vec<ObservatoryName>>>, ApiError> {
  let names = store
    .observatories_housing(body.tel_name)
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(
    names.into_iter().map(|obs_name| ObservatoryName { obs_name }).collect(),
  ))
}
