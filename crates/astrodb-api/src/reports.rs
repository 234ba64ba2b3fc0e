//! Connection check and the fixed analytical reports.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/check-db-connection` | Plain text |
//! | `GET` | `/aggregation-group-by` | Farthest pictured body per observatory |
//! | `GET` | `/aggregation-with-having` | Observatories with ≥ 2 telescopes |
//! | `GET` | `/nested-aggregation-with-group-by` | Mean pictures per observatory |
//! | `GET` | `/division` | Observatories that pictured every body |

use std::sync::Arc;

use astrodb_core::{
  query::{FarthestBody, ObservatoryRef, TelescopeCount},
  store::ObservationStore,
};
use axum::{Json, extract::State};

use crate::{Data, data, error::ApiError};

/// `GET /check-db-connection`
pub async fn check_connection<S: ObservationStore>(
  State(store): State<Arc<S>>,
) -> &'static str {
  match store.ping().await {
    Ok(()) => "connected",
    Err(e) => {
      tracing::warn!(error = %e, "database connection check failed");
      "unable to connect"
    }
  }
}

/// `GET /aggregation-group-by`
pub async fn farthest_bodies<S: ObservationStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Data<Vec<FarthestBody>>>, ApiError> {
  let rows = store
    .farthest_bodies_per_observatory()
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(rows))
}

/// `GET /aggregation-with-having`
pub async fn multiple_telescopes<S: ObservationStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Data<Vec<TelescopeCount>>>, ApiError> {
  let rows = store
    .observatories_with_multiple_telescopes()
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(rows))
}

/// `GET /nested-aggregation-with-group-by`. Answers `{"data": null}` when there are
/// no pictures.
pub async fn average_pictures<S: ObservationStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Data<Option<f64>>>, ApiError> {
  let average = store
    .average_pictures_per_observatory()
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(average))
}

/// `GET /division`
pub async fn full_coverage<S: ObservationStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Data<Vec<ObservatoryRef>>>, ApiError> {
  let rows = store
    .observatories_covering_all_bodies()
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(rows))
}
