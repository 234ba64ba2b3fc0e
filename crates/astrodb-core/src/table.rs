//! Table identifiers.
//!
//! Every coordinator failure names the table whose statement failed, so the
//! caller knows how far a write sequence got.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// A table in the observation schema.
///
/// `Display` yields the SQL table name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
  CelestialBody,
  Star,
  Star1,
  Observatory,
  Observatory1,
  TelHousedAt,
  TelHousedAt1,
  PictureTakenBy,
  TakenOf,
  Astronomer,
  Authored,
}

impl Table {
  pub fn name(self) -> &'static str { self.into() }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn display_matches_sql_names() {
    assert_eq!(Table::CelestialBody.to_string(), "celestial_body");
    assert_eq!(Table::Star1.name(), "star1");
    assert_eq!(Table::TelHousedAt1.name(), "tel_housed_at1");
    assert_eq!(Table::PictureTakenBy.name(), "picture_taken_by");
  }

  #[test]
  fn serde_agrees_with_display() {
    for table in Table::iter() {
      let json = serde_json::to_value(table).unwrap();
      assert_eq!(json, serde_json::Value::String(table.to_string()));
    }
  }
}
