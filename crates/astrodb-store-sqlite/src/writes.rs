//! The multi-table write coordinator.
//!
//! Each function runs synchronously on the connection thread, inside a single
//! `tokio_rusqlite::Connection::call`.

use astrodb_core::{
  body::{BodyKey, CelestialBodyUpdate, NewStar},
  facility::{NewAstronomer, NewAuthored, NewObservatory, NewPicture, NewTelescope},
  store::WriteMode,
  table::Table,
};
use rusqlite::{Connection, OptionalExtension as _, types::Value};

use crate::{
  Error, Result,
  encode::encode_date,
  plan::{self, Assignments, Step},
};

fn key_params(key: &BodyKey) -> Vec<Value> {
  vec![key.cb_name.clone().into(), key.coordinate.clone().into()]
}

fn key_filter(key: &BodyKey) -> Vec<(&'static str, Value)> {
  vec![
    ("cb_name", key.cb_name.clone().into()),
    ("coordinate", key.coordinate.clone().into()),
  ]
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

/// `celestial_body` → `star1` (reuse-or-create) → `star`.
///
/// The `star1` row is keyed by temperature and shared. An existing row is
/// reused untouched; its spectral columns are not overwritten by this star's
/// values.
pub fn insert_star(conn: &mut Connection, mode: WriteMode, star: &NewStar) -> Result<()> {
  let key = star.key();
  let steps = [
    Step::new(
      Table::CelestialBody,
      "INSERT INTO celestial_body (cb_name, coordinate, visible, distance, diameter)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      vec![
        star.cb_name.clone().into(),
        star.coordinate.clone().into(),
        star.visible.into(),
        star.distance.into(),
        star.diameter.into(),
      ],
    )
    .undo(
      "DELETE FROM celestial_body WHERE cb_name = ?1 AND coordinate = ?2",
      key_params(&key),
    ),
    Step::new(
      Table::Star1,
      "INSERT INTO star1 (temperature, spectral_class, luminosity_class, color)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT (temperature) DO NOTHING",
      vec![
        star.temperature.into(),
        star.spectral_class.clone().into(),
        star.luminosity_class.clone().into(),
        star.color.clone().into(),
      ],
    )
    .undo("DELETE FROM star1 WHERE temperature = ?1", vec![star.temperature.into()]),
    Step::new(
      Table::Star,
      "INSERT INTO star (cb_name, coordinate, age, temperature) VALUES (?1, ?2, ?3, ?4)",
      vec![
        star.cb_name.clone().into(),
        star.coordinate.clone().into(),
        star.age.into(),
        star.temperature.into(),
      ],
    ),
  ];

  plan::run(conn, mode, &steps)
}

/// `observatory1` → `observatory`.
pub fn insert_observatory(
  conn: &mut Connection,
  mode: WriteMode,
  obs: &NewObservatory,
) -> Result<()> {
  let steps = [
    Step::new(
      Table::Observatory1,
      "INSERT INTO observatory1 (obs_name, address) VALUES (?1, ?2)",
      vec![obs.obs_name.clone().into(), obs.address.clone().into()],
    )
    .undo(
      "DELETE FROM observatory1 WHERE obs_name = ?1",
      vec![obs.obs_name.clone().into()],
    ),
    Step::new(
      Table::Observatory,
      "INSERT INTO observatory (obs_id, obs_name) VALUES (?1, ?2)",
      vec![obs.obs_id.into(), obs.obs_name.clone().into()],
    ),
  ];

  plan::run(conn, mode, &steps)
}

/// `tel_housed_at1` → `tel_housed_at`.
pub fn insert_telescope(
  conn: &mut Connection,
  mode: WriteMode,
  tel: &NewTelescope,
) -> Result<()> {
  let steps = [
    Step::new(
      Table::TelHousedAt1,
      "INSERT INTO tel_housed_at1 (tel_name, obs_id) VALUES (?1, ?2)",
      vec![tel.tel_name.clone().into(), tel.obs_id.into()],
    )
    .undo(
      "DELETE FROM tel_housed_at1 WHERE tel_name = ?1",
      vec![tel.tel_name.clone().into()],
    ),
    Step::new(
      Table::TelHousedAt,
      "INSERT INTO tel_housed_at (tel_name, manufactured_date, model) VALUES (?1, ?2, ?3)",
      vec![
        tel.tel_name.clone().into(),
        encode_date(tel.manufactured_date).into(),
        tel.model.clone().into(),
      ],
    ),
  ];

  plan::run(conn, mode, &steps)
}

/// `picture_taken_by` → `taken_of`.
pub fn insert_picture(
  conn: &mut Connection,
  mode: WriteMode,
  pic: &NewPicture,
) -> Result<()> {
  let steps = [
    Step::new(
      Table::PictureTakenBy,
      "INSERT INTO picture_taken_by (picture_id, date_taken, link, tel_name)
       VALUES (?1, ?2, ?3, ?4)",
      vec![
        pic.picture_id.into(),
        encode_date(pic.date_taken).into(),
        pic.link.clone().into(),
        pic.tel_name.clone().into(),
      ],
    )
    .undo(
      "DELETE FROM picture_taken_by WHERE picture_id = ?1",
      vec![pic.picture_id.into()],
    ),
    Step::new(
      Table::TakenOf,
      "INSERT INTO taken_of (picture_id, cb_name, coordinate) VALUES (?1, ?2, ?3)",
      vec![
        pic.picture_id.into(),
        pic.cb_name.clone().into(),
        pic.coordinate.clone().into(),
      ],
    ),
  ];

  plan::run(conn, mode, &steps)
}

pub fn insert_astronomer(conn: &Connection, ast: &NewAstronomer) -> Result<()> {
  conn
    .execute(
      "INSERT INTO astronomer (ast_id, ast_name) VALUES (?1, ?2)",
      rusqlite::params![ast.ast_id, ast.ast_name],
    )
    .map_err(|source| Error::InsertFailed { table: Table::Astronomer, source })?;
  Ok(())
}

pub fn insert_authored(conn: &Connection, au: &NewAuthored) -> Result<()> {
  conn
    .execute(
      "INSERT INTO authored (ast_id, th_name, ph_name) VALUES (?1, ?2, ?3)",
      rusqlite::params![au.ast_id, au.th_name, au.ph_name],
    )
    .map_err(|source| Error::InsertFailed { table: Table::Authored, source })?;
  Ok(())
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Partial update of a body and its star in one transaction.
///
/// Nothing is committed unless every statement succeeds; a missing star
/// discards an already-applied `celestial_body` update.
pub fn update_celestial_body(
  conn: &mut Connection,
  key: &BodyKey,
  update: &CelestialBodyUpdate,
) -> Result<()> {
  if update.is_empty() {
    return Ok(());
  }

  let tx = conn.transaction()?;

  let body = Assignments::new()
    .set("visible", update.visible)
    .set("distance", update.distance)
    .set("diameter", update.diameter);
  if !body.is_empty() {
    let changed = body
      .apply(&tx, Table::CelestialBody, key_filter(key))
      .map_err(|source| Error::UpdateFailed { table: Table::CelestialBody, source })?;
    if changed == 0 {
      return Err(Error::NotFound(Table::CelestialBody));
    }
  }

  if update.touches_star() {
    let current: i64 = tx
      .query_row(
        "SELECT temperature FROM star WHERE cb_name = ?1 AND coordinate = ?2",
        rusqlite::params![key.cb_name, key.coordinate],
        |r| r.get(0),
      )
      .optional()?
      .ok_or(Error::NotFound(Table::Star))?;

    let new_temperature = update.temperature.filter(|t| *t != current);
    let target = new_temperature.unwrap_or(current);

    if let Some(temperature) = new_temperature {
      let exists = tx
        .query_row(
          "SELECT 1 FROM star1 WHERE temperature = ?1",
          rusqlite::params![temperature],
          |_| Ok(()),
        )
        .optional()?
        .is_some();

      if !exists {
        tx.execute(
          "INSERT INTO star1 (temperature, spectral_class, luminosity_class, color)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            temperature,
            update.spectral_class,
            update.luminosity_class,
            update.color,
          ],
        )
        .map_err(|source| Error::InsertFailed { table: Table::Star1, source })?;
        tracing::debug!(temperature, "created star1 row for new temperature");
      }
    }

    let spectrum = Assignments::new()
      .set("spectral_class", update.spectral_class.clone())
      .set("luminosity_class", update.luminosity_class.clone())
      .set("color", update.color.clone());
    if !spectrum.is_empty() {
      spectrum
        .apply(&tx, Table::Star1, vec![("temperature", target.into())])
        .map_err(|source| Error::UpdateFailed { table: Table::Star1, source })?;
    }

    let star = Assignments::new()
      .set("age", update.age)
      .set("temperature", new_temperature);
    if !star.is_empty() {
      star
        .apply(&tx, Table::Star, key_filter(key))
        .map_err(|source| Error::UpdateFailed { table: Table::Star, source })?;
    }
  }

  tx.commit()?;
  tracing::debug!(cb_name = %key.cb_name, coordinate = %key.coordinate, "celestial body updated");
  Ok(())
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

fn delete_by_key(conn: &Connection, table: Table, sql: &str, key: &BodyKey) -> Result<()> {
  let deleted = conn
    .execute(sql, rusqlite::params![key.cb_name, key.coordinate])
    .map_err(|source| Error::DeleteFailed { table, source })?;
  if deleted == 0 {
    return Err(Error::NotFound(table));
  }
  Ok(())
}

/// Does not cascade; a body still referenced by `star` or `taken_of` fails
/// the foreign-key check.
pub fn delete_celestial_body(conn: &Connection, key: &BodyKey) -> Result<()> {
  delete_by_key(
    conn,
    Table::CelestialBody,
    "DELETE FROM celestial_body WHERE cb_name = ?1 AND coordinate = ?2",
    key,
  )
}

pub fn delete_star(conn: &Connection, key: &BodyKey) -> Result<()> {
  delete_by_key(
    conn,
    Table::Star,
    "DELETE FROM star WHERE cb_name = ?1 AND coordinate = ?2",
    key,
  )
}
