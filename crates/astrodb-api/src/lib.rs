//! JSON API for astrodb.
//!
//! Exposes an axum [`Router`] backed by any
//! [`astrodb_core::store::ObservationStore`]. Paths and body shapes match the
//! browser client: writes answer `{"success": bool}`, reads answer
//! `{"data": ...}`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(astrodb_api::api_router(store.clone()))
//! ```

pub mod astronomers;
pub mod bodies;
pub mod error;
pub mod facilities;
pub mod reports;

use std::sync::Arc;

use astrodb_core::store::ObservationStore;
use axum::{
  Json, Router,
  extract::FromRequest,
  routing::{get, post},
};
use serde::Serialize;

pub use error::ApiError;

// ─── Envelopes ────────────────────────────────────────────────────────────────

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct Success {
  pub success: bool,
}

pub(crate) fn success() -> Json<Success> { Json(Success { success: true }) }

/// `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct Data<T> {
  pub data: T,
}

pub(crate) fn data<T>(data: T) -> Json<Data<T>> { Json(Data { data }) }

// ─── Extractor ────────────────────────────────────────────────────────────────

/// A JSON request body whose rejection is an [`ApiError`], so malformed input
/// still gets the `{"success": false}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested or merged into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ObservationStore + 'static,
{
  Router::new()
    .route("/check-db-connection", get(reports::check_connection::<S>))
    // Bodies and stars
    .route("/celestial_body", get(bodies::list::<S>))
    .route("/insert-star", post(bodies::insert_star::<S>))
    .route("/update-celestial-body", post(bodies::update::<S>))
    .route("/delete-celestial-body", post(bodies::delete_body::<S>))
    .route("/delete-star", post(bodies::delete_star::<S>))
    .route("/get-star", post(bodies::get_star::<S>))
    .route("/get-cb-within-dist", post(bodies::within_distance::<S>))
    // Observatories, telescopes, pictures
    .route("/insert-observatory", post(facilities::insert_observatory::<S>))
    .route("/insert-telescope", post(facilities::insert_telescope::<S>))
    .route("/insert-picture", post(facilities::insert_picture::<S>))
    .route(
      "/search-observatories-telescopes",
      post(facilities::search_by_telescope::<S>),
    )
    // Astronomers
    .route("/insert-astronomer", post(astronomers::insert_astronomer::<S>))
    .route("/insert-authored", post(astronomers::insert_authored::<S>))
    .route("/fetch-astronomers-authored", post(astronomers::fetch_authored::<S>))
    // Reports
    .route("/aggregation-group-by", get(reports::farthest_bodies::<S>))
    .route("/aggregation-with-having", get(reports::multiple_telescopes::<S>))
    .route(
      "/nested-aggregation-with-group-by",
      get(reports::average_pictures::<S>),
    )
    .route("/division", get(reports::full_coverage::<S>))
    .with_state(store)
}
