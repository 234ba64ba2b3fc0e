//! The `ObservationStore` trait and its supporting types.
//!
//! The trait is implemented by storage backends (e.g. `astrodb-store-sqlite`).
//! Higher layers (`astrodb-api`, `astrodb-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  body::{BodyKey, CelestialBody, CelestialBodyUpdate, NewStar, StarView},
  facility::{
    NewAstronomer, NewAuthored, NewObservatory, NewPicture, NewTelescope,
  },
  query::{
    AuthoredProjection, AuthoredRow, FarthestBody, ObservatoryRef,
    TelescopeCount,
  },
  table::Table,
};

// ─── Write mode ──────────────────────────────────────────────────────────────

/// How a multi-table insert sequence is made all-or-nothing.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
  /// One transaction per sequence; a failed step rolls everything back.
  #[default]
  Transactional,
  /// Every step autocommits; a failed step triggers best-effort
  /// compensating deletes of the steps already applied.
  Compensating,
}

// ─── Failure classification ──────────────────────────────────────────────────

/// Lets a layer above the store classify a backend error without knowing the
/// backend.
pub trait StoreFailure: std::error::Error {
  /// The table whose statement failed, if the failure belongs to a write
  /// sequence.
  fn failed_table(&self) -> Option<Table>;

  /// The targeted row does not exist.
  fn is_not_found(&self) -> bool;

  /// The request itself was malformed (e.g. an empty projection).
  fn is_invalid_request(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an astrodb store backend.
///
/// Every method is one logical operation: it acquires the connection once,
/// runs its statements, and releases it on every exit path. Multi-table
/// writes are all-or-nothing according to the backend's [`WriteMode`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ObservationStore: Send + Sync {
  type Error: StoreFailure + Send + Sync + 'static;

  /// Check that the database answers a trivial query.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Multi-table inserts ───────────────────────────────────────────────

  /// Create a celestial body, reuse or create its `star1` row, and create
  /// the `star` row.
  fn insert_star(
    &self,
    star: NewStar,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_observatory(
    &self,
    observatory: NewObservatory,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_telescope(
    &self,
    telescope: NewTelescope,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_picture(
    &self,
    picture: NewPicture,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Single-table inserts ──────────────────────────────────────────────

  fn insert_astronomer(
    &self,
    astronomer: NewAstronomer,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_authored(
    &self,
    authored: NewAuthored,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Update / delete ───────────────────────────────────────────────────

  /// Apply a partial update across `celestial_body`, `star` and `star1`.
  ///
  /// A temperature change repoints the star at the `star1` row for the new
  /// temperature, creating that row if none exists. Spectral fields update
  /// the `star1` row at the resulting temperature without touching columns
  /// that were not provided.
  fn update_celestial_body(
    &self,
    key: BodyKey,
    update: CelestialBodyUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a celestial body. Does not cascade: dependent `star` and
  /// `taken_of` rows must be removed first.
  fn delete_celestial_body(
    &self,
    key: BodyKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the star subtype row. The shared `star1` row is kept.
  fn delete_star(
    &self,
    key: BodyKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn list_celestial_bodies(
    &self,
  ) -> impl Future<Output = Result<Vec<CelestialBody>, Self::Error>> + Send + '_;

  /// Bodies strictly closer than `distance`.
  fn celestial_bodies_within(
    &self,
    distance: f64,
  ) -> impl Future<Output = Result<Vec<CelestialBody>, Self::Error>> + Send + '_;

  /// A star with its body and spectral attributes. `None` if not found.
  fn get_star(
    &self,
    key: BodyKey,
  ) -> impl Future<Output = Result<Option<StarView>, Self::Error>> + Send + '_;

  fn authored<'a>(
    &'a self,
    projection: &'a AuthoredProjection,
  ) -> impl Future<Output = Result<Vec<AuthoredRow>, Self::Error>> + Send + 'a;

  /// Names of the observatories housing a telescope called `tel_name`.
  fn observatories_housing(
    &self,
    tel_name: String,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  fn farthest_bodies_per_observatory(
    &self,
  ) -> impl Future<Output = Result<Vec<FarthestBody>, Self::Error>> + Send + '_;

  fn observatories_with_multiple_telescopes(
    &self,
  ) -> impl Future<Output = Result<Vec<TelescopeCount>, Self::Error>> + Send + '_;

  /// Mean number of pictures per observatory that has any. `None` when no
  /// pictures exist.
  fn average_pictures_per_observatory(
    &self,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + '_;

  /// Observatories whose telescopes have pictured every celestial body.
  fn observatories_covering_all_bodies(
    &self,
  ) -> impl Future<Output = Result<Vec<ObservatoryRef>, Self::Error>> + Send + '_;
}
