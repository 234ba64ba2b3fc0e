//! Handlers for celestial bodies and stars.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/celestial_body` | Every body |
//! | `POST` | `/insert-star` | Body: [`NewStar`]; 201 |
//! | `POST` | `/update-celestial-body` | Body: [`UpdateBody`] |
//! | `POST` | `/delete-celestial-body` | Body: [`BodyKey`]; does not cascade |
//! | `POST` | `/delete-star` | Body: [`BodyKey`] |
//! | `POST` | `/get-star` | Body: [`BodyKey`]; 404 if not found |
//! | `POST` | `/get-cb-within-dist` | Body: `{"distance": f64}` |

use std::sync::Arc;

use astrodb_core::{
  body::{BodyKey, CelestialBody, CelestialBodyUpdate, NewStar, StarView},
  store::ObservationStore,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::{Data, JsonBody, Success, data, error::ApiError, success};

/// `GET /celestial_body`
pub async fn list<S: ObservationStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Data<Vec<CelestialBody>>>, ApiError> {
  let bodies = store
    .list_celestial_bodies()
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(bodies))
}

/// `POST /insert-star`
pub async fn insert_star<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(star): JsonBody<NewStar>,
) -> Result<impl IntoResponse, ApiError> {
  store.insert_star(star).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, success()))
}

/// JSON body accepted by `POST /update-celestial-body`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub cb_name:    String,
  pub coordinate: String,
  #[serde(rename = "updateData", default)]
  pub update:     CelestialBodyUpdate,
}

/// `POST /update-celestial-body`
pub async fn update<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<UpdateBody>,
) -> Result<Json<Success>, ApiError> {
  let key = BodyKey::new(body.cb_name, body.coordinate);
  store
    .update_celestial_body(key, body.update)
    .await
    .map_err(ApiError::from_store)?;
  Ok(success())
}

/// `POST /delete-celestial-body`
pub async fn delete_body<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(key): JsonBody<BodyKey>,
) -> Result<Json<Success>, ApiError> {
  store
    .delete_celestial_body(key)
    .await
    .map_err(ApiError::from_store)?;
  Ok(success())
}

/// `POST /delete-star`
pub async fn delete_star<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(key): JsonBody<BodyKey>,
) -> Result<Json<Success>, ApiError> {
  store.delete_star(key).await.map_err(ApiError::from_store)?;
  Ok(success())
}

/// `POST /get-star`
pub async fn get_star<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(key): JsonBody<BodyKey>,
) -> Result<Json<Data<StarView>>, ApiError> {
  let message = format!("star {} at {} not found", key.cb_name, key.coordinate);
  let star = store
    .get_star(key)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::NotFound { message, stage: None })?;
  Ok(data(star))
}

#[derive(Debug, Deserialize)]
pub struct DistanceBody {
  pub distance: f64,
}

/// `POST /get-cb-within-dist`
pub async fn within_distance<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<DistanceBody>,
) -> Result<Json<Data<Vec<CelestialBody>>>, ApiError> {
  let bodies = store
    .celestial_bodies_within(body.distance)
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(bodies))
}
