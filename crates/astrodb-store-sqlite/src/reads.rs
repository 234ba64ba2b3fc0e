//! Read queries. Plain parameterised SELECTs; the only dynamic SQL is the
//! authored projection, whose column list comes from a closed enum.

use astrodb_core::{
  body::{BodyKey, CelestialBody, StarView},
  query::{
    AuthoredColumn, AuthoredProjection, AuthoredRow, FarthestBody,
    ObservatoryRef,
  },
};
use rusqlite::{Connection, OptionalExtension as _};

use crate::encode::{RawTelescopeCount, body_from_row, star_from_row};

const BODY_COLUMNS: &str = "cb_name, coordinate, visible, distance, diameter";

/// Column order must match [`star_from_row`].
const STAR_VIEW: &str = "
  SELECT cb.cb_name, cb.coordinate, cb.visible, cb.distance, cb.diameter,
         s.age, s.temperature,
         s1.spectral_class, s1.luminosity_class, s1.color
  FROM star s
  JOIN celestial_body cb
    ON cb.cb_name = s.cb_name AND cb.coordinate = s.coordinate
  LEFT JOIN star1 s1 ON s1.temperature = s.temperature";

// ─── Bodies & stars ──────────────────────────────────────────────────────────

pub fn list_celestial_bodies(conn: &Connection) -> rusqlite::Result<Vec<CelestialBody>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {BODY_COLUMNS} FROM celestial_body ORDER BY cb_name, coordinate"
  ))?;
  let rows = stmt
    .query_map([], |row| body_from_row(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn celestial_bodies_within(
  conn: &Connection,
  distance: f64,
) -> rusqlite::Result<Vec<CelestialBody>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {BODY_COLUMNS} FROM celestial_body WHERE distance < ?1
     ORDER BY distance, cb_name"
  ))?;
  let rows = stmt
    .query_map(rusqlite::params![distance], |row| body_from_row(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn get_star(conn: &Connection, key: &BodyKey) -> rusqlite::Result<Option<StarView>> {
  conn
    .query_row(
      &format!("{STAR_VIEW} WHERE s.cb_name = ?1 AND s.coordinate = ?2"),
      rusqlite::params![key.cb_name, key.coordinate],
      star_from_row,
    )
    .optional()
}

// ─── Astronomers ─────────────────────────────────────────────────────────────

pub fn authored(
  conn: &Connection,
  projection: &AuthoredProjection,
) -> rusqlite::Result<Vec<AuthoredRow>> {
  let sql = format!(
    "SELECT {} FROM authored au
     JOIN astronomer ast ON au.ast_id = ast.ast_id
     ORDER BY au.ast_id, au.th_name, au.ph_name",
    projection.select_list()
  );
  let columns: Vec<AuthoredColumn> = projection.columns().collect();

  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map([], |row| {
      let mut out = AuthoredRow::default();
      for (idx, column) in columns.iter().enumerate() {
        match column {
          AuthoredColumn::AstId => out.ast_id = Some(row.get(idx)?),
          AuthoredColumn::ThName => out.th_name = Some(row.get(idx)?),
          AuthoredColumn::PhName => out.ph_name = Some(row.get(idx)?),
          AuthoredColumn::AstName => out.ast_name = Some(row.get(idx)?),
        }
      }
      Ok(out)
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Observatories ───────────────────────────────────────────────────────────

pub fn observatories_housing(
  conn: &Connection,
  tel_name: &str,
) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT obs.obs_name
     FROM tel_housed_at1 th1
     JOIN observatory obs ON th1.obs_id = obs.obs_id
     WHERE th1.tel_name = ?1",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![tel_name], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Telescopes, their pictures, and the bodies pictured; correlate on
/// `th1.obs_id`.
const PICTURED_BY_OBS: &str = "
  tel_housed_at1 th1
  JOIN picture_taken_by ptb ON ptb.tel_name = th1.tel_name
  JOIN taken_of t           ON t.picture_id = ptb.picture_id";

pub fn farthest_bodies_per_observatory(
  conn: &Connection,
) -> rusqlite::Result<Vec<FarthestBody>> {
  let mut stmt = conn.prepare(
    "SELECT DISTINCT obs.obs_id, obs.obs_name, cb.cb_name, cb.distance
     FROM observatory obs
     JOIN tel_housed_at1 th1   ON th1.obs_id = obs.obs_id
     JOIN picture_taken_by ptb ON ptb.tel_name = th1.tel_name
     JOIN taken_of t           ON t.picture_id = ptb.picture_id
     JOIN celestial_body cb
       ON cb.cb_name = t.cb_name AND cb.coordinate = t.coordinate
     WHERE cb.distance = (
       SELECT MAX(cb2.distance)
       FROM tel_housed_at1 th2
       JOIN picture_taken_by ptb2 ON ptb2.tel_name = th2.tel_name
       JOIN taken_of t2           ON t2.picture_id = ptb2.picture_id
       JOIN celestial_body cb2
         ON cb2.cb_name = t2.cb_name AND cb2.coordinate = t2.coordinate
       WHERE th2.obs_id = obs.obs_id
     )
     ORDER BY obs.obs_id, cb.cb_name",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(FarthestBody {
        obs_id:   row.get(0)?,
        obs_name: row.get(1)?,
        cb_name:  row.get(2)?,
        distance: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn observatories_with_multiple_telescopes(
  conn: &Connection,
) -> rusqlite::Result<Vec<RawTelescopeCount>> {
  let mut stmt = conn.prepare(
    "SELECT th1.obs_id, MIN(th.manufactured_date), COUNT(*)
     FROM tel_housed_at th
     JOIN tel_housed_at1 th1 ON th.tel_name = th1.tel_name
     GROUP BY th1.obs_id
     HAVING COUNT(*) >= 2
     ORDER BY th1.obs_id",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(RawTelescopeCount {
        obs_id:     row.get(0)?,
        earliest:   row.get(1)?,
        telescopes: row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn average_pictures_per_observatory(conn: &Connection) -> rusqlite::Result<Option<f64>> {
  conn.query_row(
    "SELECT AVG(amount) FROM (
       SELECT th1.obs_id, COUNT(*) AS amount
       FROM tel_housed_at1 th1
       JOIN tel_housed_at tha    ON tha.tel_name = th1.tel_name
       JOIN picture_taken_by ptb ON ptb.tel_name = th1.tel_name
       GROUP BY th1.obs_id
     )",
    [],
    |row| row.get(0),
  )
}

/// Relational division: no body exists that this observatory has not
/// pictured.
pub fn observatories_covering_all_bodies(
  conn: &Connection,
) -> rusqlite::Result<Vec<ObservatoryRef>> {
  let sql = format!(
    "SELECT obs.obs_id, obs.obs_name
     FROM observatory obs
     JOIN observatory1 obs1 ON obs1.obs_name = obs.obs_name
     WHERE NOT EXISTS (
       SELECT 1 FROM celestial_body cb
       WHERE NOT EXISTS (
         SELECT 1 FROM {PICTURED_BY_OBS}
         WHERE th1.obs_id = obs.obs_id
           AND t.cb_name = cb.cb_name
           AND t.coordinate = cb.coordinate
       )
     )
     ORDER BY obs.obs_id"
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map([], |row| {
      Ok(ObservatoryRef { obs_id: row.get(0)?, obs_name: row.get(1)? })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
