//! Error type for `astrodb-store-sqlite`.

use astrodb_core::{store::StoreFailure, table::Table};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] astrodb_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A step of an insert sequence failed; nothing from the sequence remains.
  #[error("{table} insert failed: {source}")]
  InsertFailed {
    table:  Table,
    source: rusqlite::Error,
  },

  #[error("{table} update failed: {source}")]
  UpdateFailed {
    table:  Table,
    source: rusqlite::Error,
  },

  #[error("{table} delete failed: {source}")]
  DeleteFailed {
    table:  Table,
    source: rusqlite::Error,
  },

  #[error("{0} row not found")]
  NotFound(Table),

  /// A step failed and at least one compensating delete failed too. Rows in
  /// `orphaned` may still exist.
  #[error("{table} insert failed and compensation left rows in {orphaned:?}: {source}")]
  PartialFailure {
    table:    Table,
    orphaned: Vec<Table>,
    source:   rusqlite::Error,
  },

  #[error("date parse error: {0}")]
  DateParse(String),
}

impl StoreFailure for Error {
  fn failed_table(&self) -> Option<Table> {
    match self {
      Error::InsertFailed { table, .. }
      | Error::UpdateFailed { table, .. }
      | Error::DeleteFailed { table, .. }
      | Error::PartialFailure { table, .. }
      | Error::NotFound(table) => Some(*table),
      _ => None,
    }
  }

  fn is_not_found(&self) -> bool { matches!(self, Error::NotFound(_)) }

  fn is_invalid_request(&self) -> bool { matches!(self, Error::Core(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
