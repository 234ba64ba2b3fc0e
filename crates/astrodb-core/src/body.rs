//! Celestial bodies and stars.
//!
//! A star is a celestial body with a `star` subtype row. Its spectral
//! attributes live in `star1`, a lookup shared by every star of the same
//! temperature.

use serde::{Deserialize, Serialize};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Composite key of a celestial body (and of the star that extends it).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyKey {
  pub cb_name:    String,
  pub coordinate: String,
}

impl BodyKey {
  pub fn new(cb_name: impl Into<String>, coordinate: impl Into<String>) -> Self {
    Self { cb_name: cb_name.into(), coordinate: coordinate.into() }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A `celestial_body` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
  pub cb_name:    String,
  pub coordinate: String,
  #[serde(deserialize_with = "flag::required")]
  pub visible:    bool,
  pub distance:   Option<f64>,
  pub diameter:   Option<f64>,
}

impl CelestialBody {
  pub fn key(&self) -> BodyKey { BodyKey::new(&self.cb_name, &self.coordinate) }
}

/// A star joined with its celestial body and its shared `star1` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarView {
  pub body:             CelestialBody,
  pub age:              Option<f64>,
  pub temperature:      i64,
  pub spectral_class:   Option<String>,
  pub luminosity_class: Option<String>,
  pub color:            Option<String>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Everything needed to create a star across `celestial_body`, `star1` and
/// `star`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStar {
  pub cb_name:          String,
  pub coordinate:       String,
  #[serde(deserialize_with = "flag::required")]
  pub visible:          bool,
  pub distance:         f64,
  pub diameter:         f64,
  pub temperature:      i64,
  pub spectral_class:   String,
  pub luminosity_class: String,
  pub color:            String,
  pub age:              f64,
}

impl NewStar {
  pub fn key(&self) -> BodyKey { BodyKey::new(&self.cb_name, &self.coordinate) }
}

/// A partial update of a celestial body and, optionally, its star.
///
/// `None` means "leave unchanged"; there is no way to null a column through
/// an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CelestialBodyUpdate {
  // celestial_body
  #[serde(default, deserialize_with = "flag::optional")]
  pub visible:          Option<bool>,
  pub distance:         Option<f64>,
  pub diameter:         Option<f64>,
  // star
  pub age:              Option<f64>,
  pub temperature:      Option<i64>,
  // star1
  pub spectral_class:   Option<String>,
  pub luminosity_class: Option<String>,
  pub color:            Option<String>,
}

impl CelestialBodyUpdate {
  /// Whether any `celestial_body` column is set.
  pub fn touches_body(&self) -> bool {
    self.visible.is_some() || self.distance.is_some() || self.diameter.is_some()
  }

  /// Whether any `star1` column is set.
  pub fn touches_spectrum(&self) -> bool {
    self.spectral_class.is_some()
      || self.luminosity_class.is_some()
      || self.color.is_some()
  }

  /// Whether the star subtype (`star` or `star1`) is involved at all.
  pub fn touches_star(&self) -> bool {
    self.age.is_some() || self.temperature.is_some() || self.touches_spectrum()
  }

  pub fn is_empty(&self) -> bool { !self.touches_body() && !self.touches_star() }
}

// ─── Visibility flag ─────────────────────────────────────────────────────────

/// `visible` arrives as a JSON boolean or, from the browser form, as `1`/`0`.
mod flag {
  use serde::{Deserialize, Deserializer, de::Error as _};

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Flag {
    Bool(bool),
    Int(i64),
  }

  fn to_bool<E: serde::de::Error>(flag: Flag) -> Result<bool, E> {
    match flag {
      Flag::Bool(b) => Ok(b),
      Flag::Int(0) => Ok(false),
      Flag::Int(1) => Ok(true),
      Flag::Int(n) => Err(E::custom(format!("visible must be 0 or 1, got {n}"))),
    }
  }

  pub fn required<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    to_bool(Flag::deserialize(d).map_err(|_| {
      D::Error::custom("visible must be a boolean or 0/1")
    })?)
  }

  pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Option::<Flag>::deserialize(d)
      .map_err(|_| D::Error::custom("visible must be a boolean or 0/1"))?
      .map(to_bool::<D::Error>)
      .transpose()
  }
}
