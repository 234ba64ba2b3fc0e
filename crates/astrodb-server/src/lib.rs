//! HTTP server assembly for astrodb.
//!
//! Wires the JSON API router to a concrete store, adds request tracing, and
//! provides the shutdown signal the binary waits on.

use std::{path::PathBuf, sync::Arc};

use astrodb_core::store::{ObservationStore, WriteMode};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ASTRODB_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// `transactional` (default) or `compensating`.
  #[serde(default)]
  pub write_mode: WriteMode,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("astrodb.sqlite") }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: ObservationStore + 'static,
{
  astrodb_api::api_router(store).layer(TraceLayer::new_for_http())
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
  tracing::info!("shutdown signal received");
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use astrodb_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn call(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app(store).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
      .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
  }

  fn sirius() -> Value {
    json!({
      "cb_name": "Sirius",
      "coordinate": "RA 06h 45m, Dec +16degree 43",
      "visible": true,
      "distance": 8.6,
      "diameter": 1.71,
      "temperature": 9940,
      "spectral_class": "A",
      "luminosity_class": "V",
      "color": "white",
      "age": 2.3e8
    })
  }

  fn sirius_key() -> Value {
    json!({ "cb_name": "Sirius", "coordinate": "RA 06h 45m, Dec +16degree 43" })
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_defaults_apply_without_a_file() {
    let cfg: ServerConfig = config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.write_mode, WriteMode::Transactional);
  }

  #[test]
  fn config_selects_compensating_mode() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("write_mode", "compensating")
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.write_mode, WriteMode::Compensating);
  }

  // ── Connection ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn check_db_connection_reports_connected() {
    let (status, body) = call(make_store().await, "GET", "/check-db-connection", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("connected".into()));
  }

  // ── Stars ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn insert_star_then_list_bodies() {
    let store = make_store().await;

    let (status, body) = call(store.clone(), "POST", "/insert-star", Some(sirius())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = call(store, "GET", "/celestial_body", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["distance"], json!(8.6));
  }

  #[tokio::test]
  async fn insert_star_accepts_form_visibility_flag() {
    let store = make_store().await;
    let mut star = sirius();
    star["visible"] = json!(1);

    let (status, body) = call(store.clone(), "POST", "/insert-star", Some(star)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let mut req = sirius_key();
    req["updateData"] = json!({ "visible": 0 });
    let (status, _) = call(store.clone(), "POST", "/update-celestial-body", Some(req)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(store, "GET", "/celestial_body", None).await;
    assert_eq!(body["data"][0]["visible"], json!(false));
  }

  #[tokio::test]
  async fn malformed_body_keeps_error_envelope() {
    let mut star = sirius();
    star["visible"] = json!(2);
    let (status, body) = call(make_store().await, "POST", "/insert-star", Some(star)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("visible"), "{body}");
  }

  #[tokio::test]
  async fn duplicate_star_reports_failed_stage() {
    let store = make_store().await;
    call(store.clone(), "POST", "/insert-star", Some(sirius())).await;

    let (status, body) = call(store, "POST", "/insert-star", Some(sirius())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["stage"], json!("celestial_body"));
  }

  #[tokio::test]
  async fn update_uses_update_data_field() {
    let store = make_store().await;
    call(store.clone(), "POST", "/insert-star", Some(sirius())).await;

    let mut req = sirius_key();
    req["updateData"] = json!({ "temperature": 11000, "color": "blue-white" });
    let (status, body) = call(store.clone(), "POST", "/update-celestial-body", Some(req)).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = call(store, "POST", "/get-star", Some(sirius_key())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["temperature"], json!(11000));
    assert_eq!(body["data"]["color"], json!("blue-white"));
    assert_eq!(body["data"]["spectral_class"], Value::Null);
  }

  #[tokio::test]
  async fn update_of_missing_star_is_404() {
    let mut req = sirius_key();
    req["updateData"] = json!({ "age": 1.0 });
    let (status, body) =
      call(make_store().await, "POST", "/update-celestial-body", Some(req)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["stage"], json!("star"));
  }

  #[tokio::test]
  async fn delete_requires_star_removed_first() {
    let store = make_store().await;
    call(store.clone(), "POST", "/insert-star", Some(sirius())).await;

    let (status, _) =
      call(store.clone(), "POST", "/delete-celestial-body", Some(sirius_key())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = call(store.clone(), "POST", "/delete-star", Some(sirius_key())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
      call(store.clone(), "POST", "/delete-celestial-body", Some(sirius_key())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) =
      call(store, "POST", "/get-cb-within-dist", Some(json!({ "distance": 100.0 }))).await;
    assert_eq!(body["data"], json!([]));
  }

  // ── Observatories & pictures ────────────────────────────────────────────────

  #[tokio::test]
  async fn observatory_telescope_picture_flow() {
    let store = make_store().await;
    call(store.clone(), "POST", "/insert-star", Some(sirius())).await;

    let (status, _) = call(
      store.clone(),
      "POST",
      "/insert-observatory",
      Some(json!({ "obs_id": 1, "obs_name": "Mauna Kea", "obs_address": "Hilo, HI" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
      store.clone(),
      "POST",
      "/insert-telescope",
      Some(json!({
        "tel_name": "Keck I",
        "obs_id": 1,
        "manufactured_date": "1993-05-01",
        "model": "segmented"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut picture = sirius_key();
    picture["picture_id"] = json!(1);
    picture["date"] = json!("2024-03-01");
    picture["link"] = json!("https://pictures.example/1.png");
    picture["tel_name"] = json!("Keck I");
    let (status, _) = call(store.clone(), "POST", "/insert-picture", Some(picture)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(
      store.clone(),
      "POST",
      "/search-observatories-telescopes",
      Some(json!({ "tel_name": "Keck I" })),
    )
    .await;
    assert_eq!(body["data"], json!([{ "obs_name": "Mauna Kea" }]));

    let (_, body) = call(store.clone(), "GET", "/division", None).await;
    assert_eq!(body["data"], json!([{ "obs_id": 1, "obs_name": "Mauna Kea" }]));

    let (_, body) = call(store.clone(), "GET", "/aggregation-group-by", None).await;
    assert_eq!(body["data"][0]["cb_name"], json!("Sirius"));

    let (_, body) = call(store.clone(), "GET", "/nested-aggregation-with-group-by", None).await;
    assert_eq!(body["data"], json!(1.0));

    let (_, body) = call(store, "GET", "/aggregation-with-having", None).await;
    assert_eq!(body["data"], json!([]));
  }

  // ── Astronomers ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn authored_projection_via_flags() {
    let store = make_store().await;
    call(
      store.clone(),
      "POST",
      "/insert-astronomer",
      Some(json!({ "ast_id": 1, "ast_name": "Leavitt" })),
    )
    .await;
    call(
      store.clone(),
      "POST",
      "/insert-authored",
      Some(json!({ "ast_id": 1, "th_name": "Period-Luminosity", "ph_name": "Cepheids" })),
    )
    .await;

    let (status, body) = call(
      store.clone(),
      "POST",
      "/fetch-astronomers-authored",
      Some(json!({ "ast_name": true, "ph_name": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body["data"],
      json!([{ "ph_name": "Cepheids", "ast_name": "Leavitt" }])
    );

    let (status, body) =
      call(store, "POST", "/fetch-astronomers-authored", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
  }
}
