//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Failures keep the `{"success": false}` envelope so clients only ever
//! branch on one field; `stage` names the table where a write sequence
//! stopped.

use astrodb_core::{store::StoreFailure, table::Table};
use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {message}")]
  NotFound {
    message: String,
    stage:   Option<Table>,
  },

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {message}")]
  Store {
    message: String,
    stage:   Option<Table>,
  },
}

impl ApiError {
  /// Classify a backend error. The detail is logged here and echoed to the
  /// client as a message only.
  pub fn from_store<E: StoreFailure>(e: E) -> Self {
    let message = e.to_string();
    let stage = e.failed_table();
    if e.is_not_found() {
      ApiError::NotFound { message, stage }
    } else if e.is_invalid_request() {
      ApiError::BadRequest(message)
    } else {
      tracing::warn!(error = %message, stage = ?stage, "store operation failed");
      ApiError::Store { message, stage }
    }
  }
}

impl From<astrodb_core::Error> for ApiError {
  fn from(e: astrodb_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, stage) = match self {
      ApiError::NotFound { message, stage } => (StatusCode::NOT_FOUND, message, stage),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m, None),
      ApiError::Store { message, stage } => {
        (StatusCode::INTERNAL_SERVER_ERROR, message, stage)
      }
    };
    let body = match stage {
      Some(stage) => json!({ "success": false, "error": message, "stage": stage }),
      None => json!({ "success": false, "error": message }),
    };
    (status, Json(body)).into_response()
  }
}
