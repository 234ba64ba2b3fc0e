//! [`SqliteStore`], the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use astrodb_core::{
  body::{BodyKey, CelestialBody, CelestialBodyUpdate, NewStar, StarView},
  facility::{
    NewAstronomer, NewAuthored, NewObservatory, NewPicture, NewTelescope,
  },
  query::{
    AuthoredProjection, AuthoredRow, FarthestBody, ObservatoryRef,
    TelescopeCount,
  },
  store::{ObservationStore, WriteMode},
};

use crate::{
  Error, Result,
  encode::RawTelescopeCount,
  reads,
  schema::SCHEMA,
  writes,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An observation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. The
/// connection thread serialises every operation, so concurrent callers
/// cannot interleave inside a write sequence.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
  mode: WriteMode,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, mode: WriteMode::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, mode: WriteMode::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Select how multi-table inserts are made all-or-nothing.
  pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn write_mode(&self) -> WriteMode { self.mode }

  /// Close the underlying connection. Every clone of this store fails
  /// afterwards.
  pub async fn close(&self) -> Result<()> {
    self.conn.clone().close().await?;
    tracing::info!("store closed");
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a read on the connection thread.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
  {
    Ok(self.conn.call(move |conn| Ok(f(conn)?)).await?)
  }

  /// Run a write sequence on the connection thread. The sequence reports its
  /// own domain error, which is passed through untouched.
  async fn write<F>(&self, f: F) -> Result<()>
  where
    F: FnOnce(&mut rusqlite::Connection) -> Result<()> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = Error;

  async fn ping(&self) -> Result<()> {
    self
      .read(|conn| conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0)))
      .await?;
    Ok(())
  }

  // ── Multi-table inserts ───────────────────────────────────────────────────

  async fn insert_star(&self, star: NewStar) -> Result<()> {
    let mode = self.mode;
    self.write(move |conn| writes::insert_star(conn, mode, &star)).await
  }

  async fn insert_observatory(&self, observatory: NewObservatory) -> Result<()> {
    let mode = self.mode;
    self
      .write(move |conn| writes::insert_observatory(conn, mode, &observatory))
      .await
  }

  async fn insert_telescope(&self, telescope: NewTelescope) -> Result<()> {
    let mode = self.mode;
    self
      .write(move |conn| writes::insert_telescope(conn, mode, &telescope))
      .await
  }

  async fn insert_picture(&self, picture: NewPicture) -> Result<()> {
    let mode = self.mode;
    self
      .write(move |conn| writes::insert_picture(conn, mode, &picture))
      .await
  }

  // ── Single-table inserts ──────────────────────────────────────────────────

  async fn insert_astronomer(&self, astronomer: NewAstronomer) -> Result<()> {
    self
      .write(move |conn| writes::insert_astronomer(conn, &astronomer))
      .await
  }

  async fn insert_authored(&self, authored: NewAuthored) -> Result<()> {
    self
      .write(move |conn| writes::insert_authored(conn, &authored))
      .await
  }

  // ── Update / delete ───────────────────────────────────────────────────────

  async fn update_celestial_body(
    &self,
    key:    BodyKey,
    update: CelestialBodyUpdate,
  ) -> Result<()> {
    self
      .write(move |conn| writes::update_celestial_body(conn, &key, &update))
      .await
  }

  async fn delete_celestial_body(&self, key: BodyKey) -> Result<()> {
    self
      .write(move |conn| writes::delete_celestial_body(conn, &key))
      .await
  }

  async fn delete_star(&self, key: BodyKey) -> Result<()> {
    self.write(move |conn| writes::delete_star(conn, &key)).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_celestial_bodies(&self) -> Result<Vec<CelestialBody>> {
    self.read(reads::list_celestial_bodies).await
  }

  async fn celestial_bodies_within(&self, distance: f64) -> Result<Vec<CelestialBody>> {
    self
      .read(move |conn| reads::celestial_bodies_within(conn, distance))
      .await
  }

  async fn get_star(&self, key: BodyKey) -> Result<Option<StarView>> {
    self.read(move |conn| reads::get_star(conn, &key)).await
  }

  async fn authored(&self, projection: &AuthoredProjection) -> Result<Vec<AuthoredRow>> {
    let projection = projection.clone();
    self.read(move |conn| reads::authored(conn, &projection)).await
  }

  async fn observatories_housing(&self, tel_name: String) -> Result<Vec<String>> {
    self
      .read(move |conn| reads::observatories_housing(conn, &tel_name))
      .await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn farthest_bodies_per_observatory(&self) -> Result<Vec<FarthestBody>> {
    self.read(reads::farthest_bodies_per_observatory).await
  }

  async fn observatories_with_multiple_telescopes(&self) -> Result<Vec<TelescopeCount>> {
    let raws = self
      .read(reads::observatories_with_multiple_telescopes)
      .await?;
    raws.into_iter().map(RawTelescopeCount::into_count).collect()
  }

  async fn average_pictures_per_observatory(&self) -> Result<Option<f64>> {
    self.read(reads::average_pictures_per_observatory).await
  }

  async fn observatories_covering_all_bodies(&self) -> Result<Vec<ObservatoryRef>> {
    self.read(reads::observatories_covering_all_bodies).await
  }
}
