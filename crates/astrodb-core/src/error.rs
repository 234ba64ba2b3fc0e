//! Error types for `astrodb-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A projection request selected no columns.
  #[error("at least one column must be selected")]
  EmptyProjection,

  #[error("unknown authored column: {0:?}")]
  UnknownColumn(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
