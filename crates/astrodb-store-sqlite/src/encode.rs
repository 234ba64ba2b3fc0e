//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings so that `MIN`/`MAX` and ordering
//! work lexicographically.

use astrodb_core::{
  body::{CelestialBody, StarView},
  query::TelescopeCount,
};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

/// Map `cb_name, coordinate, visible, distance, diameter` starting at
/// column `offset`.
pub fn body_from_row(
  row: &rusqlite::Row<'_>,
  offset: usize,
) -> rusqlite::Result<CelestialBody> {
  Ok(CelestialBody {
    cb_name:    row.get(offset)?,
    coordinate: row.get(offset + 1)?,
    visible:    row.get(offset + 2)?,
    distance:   row.get(offset + 3)?,
    diameter:   row.get(offset + 4)?,
  })
}

/// Map a `star ⋈ celestial_body ⋈ star1` row (see `reads::STAR_VIEW`).
pub fn star_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StarView> {
  Ok(StarView {
    body:             body_from_row(row, 0)?,
    age:              row.get(5)?,
    temperature:      row.get(6)?,
    spectral_class:   row.get(7)?,
    luminosity_class: row.get(8)?,
    color:            row.get(9)?,
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from the telescope-count report, date still encoded.
pub struct RawTelescopeCount {
  pub obs_id:     i64,
  pub earliest:   String,
  pub telescopes: i64,
}

impl RawTelescopeCount {
  pub fn into_count(self) -> Result<TelescopeCount> {
    Ok(TelescopeCount {
      obs_id:                self.obs_id,
      earliest_manufactured: decode_date(&self.earliest)?,
      telescopes:            self.telescopes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_roundtrip() {
    let d = NaiveDate::from_ymd_opt(1990, 4, 24).unwrap();
    assert_eq!(encode_date(d), "1990-04-24");
    assert_eq!(decode_date("1990-04-24").unwrap(), d);
  }

  #[test]
  fn slash_dates_are_rejected() {
    assert!(matches!(decode_date("1990/04/24"), Err(Error::DateParse(_))));
  }
}
