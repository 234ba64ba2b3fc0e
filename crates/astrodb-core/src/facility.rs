//! Observatories, telescopes, pictures and astronomers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An observatory, stored across `observatory1` (name → address) and
/// `observatory` (id → name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObservatory {
  pub obs_id:   i64,
  pub obs_name: String,
  #[serde(rename = "obs_address")]
  pub address:  String,
}

/// A telescope, stored across `tel_housed_at1` (where it is housed) and
/// `tel_housed_at` (what it is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTelescope {
  pub tel_name:          String,
  pub obs_id:            i64,
  pub manufactured_date: NaiveDate,
  pub model:             String,
}

/// A picture, stored across `picture_taken_by` (capture metadata) and
/// `taken_of` (subject body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPicture {
  pub picture_id: i64,
  #[serde(rename = "date")]
  pub date_taken: NaiveDate,
  pub link:       String,
  pub tel_name:   String,
  pub cb_name:    String,
  pub coordinate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAstronomer {
  pub ast_id:   i64,
  pub ast_name: String,
}

/// An `authored` row linking an astronomer to a theory and a phenomenon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuthored {
  pub ast_id:  i64,
  pub th_name: String,
  pub ph_name: String,
}
