//! Handlers for astronomers and their authored works.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/insert-astronomer` | Body: [`NewAstronomer`]; 201 |
//! | `POST` | `/insert-authored` | Body: [`NewAuthored`]; 201 |
//! | `POST` | `/fetch-astronomers-authored` | Body: [`AuthoredBody`] |

use std::sync::Arc;

use astrodb_core::{
  facility::{NewAstronomer, NewAuthored},
  query::{AuthoredColumn, AuthoredProjection, AuthoredRow},
  store::ObservationStore,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::{Data, JsonBody, data, error::ApiError, success};

/// `POST /insert-astronomer`
pub async fn insert_astronomer<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(astronomer): JsonBody<NewAstronomer>,
) -> Result<impl IntoResponse, ApiError> {
  store
    .insert_astronomer(astronomer)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, success()))
}

/// `POST /insert-authored`
pub async fn insert_authored<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(authored): JsonBody<NewAuthored>,
) -> Result<impl IntoResponse, ApiError> {
  store
    .insert_authored(authored)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, success()))
}

/// Column selection for `POST /fetch-astronomers-authored`.
///
/// Columns may be listed (`{"columns": ["ast_id", "ast_name"]}`) or flagged
/// the way the browser form sends them (`{"ast_id": true, ...}`); both forms
/// are merged. Anything outside [`AuthoredColumn`] is rejected by
/// deserialisation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthoredBody {
  pub columns:  Vec<AuthoredColumn>,
  pub ast_id:   bool,
  pub th_name:  bool,
  pub ph_name:  bool,
  pub ast_name: bool,
}

impl AuthoredBody {
  pub fn projection(self) -> astrodb_core::Result<AuthoredProjection> {
    let flagged = [
      (self.ast_id, AuthoredColumn::AstId),
      (self.th_name, AuthoredColumn::ThName),
      (self.ph_name, AuthoredColumn::PhName),
      (self.ast_name, AuthoredColumn::AstName),
    ]
    .into_iter()
    .filter_map(|(on, column)| on.then_some(column));

    AuthoredProjection::new(self.columns.into_iter().chain(flagged))
  }
}

/// `POST /fetch-astronomers-authored`
pub async fn fetch_authored<S: ObservationStore>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<AuthoredBody>,
) -> Result<Json<Data<Vec<AuthoredRow>>>, ApiError> {
  let projection = body.projection()?;
  let rows = store
    .authored(&projection)
    .await
    .map_err(ApiError::from_store)?;
  Ok(data(rows))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_and_list_merge() {
    let body: AuthoredBody =
      serde_json::from_str(r#"{"columns": ["ph_name"], "ast_id": true}"#).unwrap();
    let p = body.projection().unwrap();
    assert_eq!(p.select_list(), "au.ast_id, au.ph_name");
  }

  #[test]
  fn nothing_selected_is_rejected() {
    let body: AuthoredBody = serde_json::from_str("{}").unwrap();
    assert!(matches!(
      body.projection(),
      Err(astrodb_core::Error::EmptyProjection)
    ));
  }

  #[test]
  fn unknown_column_fails_to_deserialise() {
    let body = serde_json::from_str::<AuthoredBody>(r#"{"columns": ["password"]}"#);
    assert!(body.is_err());
  }
}
