//! Write plans: ordered single-table statements and the executor that makes
//! them all-or-nothing.
//!
//! A plan is a slice of [`Step`]s. Under [`WriteMode::Transactional`] the
//! steps share one transaction. Under [`WriteMode::Compensating`] each step
//! autocommits, and a failure replays the [`Undo`] of every applied step in
//! reverse order.

use astrodb_core::{store::WriteMode, table::Table};
use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{Error, Result};

// ─── Steps ───────────────────────────────────────────────────────────────────

/// A compensating statement for a [`Step`].
pub struct Undo {
  pub sql:    &'static str,
  pub params: Vec<Value>,
}

/// One single-table write in a sequence.
pub struct Step {
  pub table:  Table,
  pub sql:    &'static str,
  pub params: Vec<Value>,
  pub undo:   Option<Undo>,
}

impl Step {
  pub fn new(table: Table, sql: &'static str, params: Vec<Value>) -> Self {
    Self { table, sql, params, undo: None }
  }

  pub fn undo(mut self, sql: &'static str, params: Vec<Value>) -> Self {
    self.undo = Some(Undo { sql, params });
    self
  }
}

fn execute(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<usize> {
  conn.execute(sql, params_from_iter(params.iter()))
}

// ─── Executor ────────────────────────────────────────────────────────────────

/// Run `steps` in order under `mode`.
///
/// On failure the error names the table of the failing step. A step that
/// changed zero rows (e.g. `ON CONFLICT DO NOTHING` hit an existing row)
/// did not create anything, so it is never compensated.
pub fn run(conn: &mut Connection, mode: WriteMode, steps: &[Step]) -> Result<()> {
  match mode {
    WriteMode::Transactional => run_transactional(conn, steps),
    WriteMode::Compensating => run_compensating(conn, steps),
  }
}

fn run_transactional(conn: &mut Connection, steps: &[Step]) -> Result<()> {
  let tx = conn.transaction()?;

  for step in steps {
    if let Err(source) = execute(&tx, step.sql, &step.params) {
      tracing::warn!(table = %step.table, error = %source, "insert failed; rolling back");
      // Dropping `tx` rolls back.
      return Err(Error::InsertFailed { table: step.table, source });
    }
  }

  tx.commit()?;
  tracing::debug!(steps = steps.len(), "write sequence committed");
  Ok(())
}

fn run_compensating(conn: &Connection, steps: &[Step]) -> Result<()> {
  let mut applied: Vec<&Step> = Vec::with_capacity(steps.len());

  for step in steps {
    match execute(conn, step.sql, &step.params) {
      Ok(0) => {}
      Ok(_) => applied.push(step),
      Err(source) => {
        tracing::warn!(table = %step.table, error = %source, "insert failed; compensating");
        let orphaned = compensate(conn, &applied);
        return Err(if orphaned.is_empty() {
          Error::InsertFailed { table: step.table, source }
        } else {
          Error::PartialFailure { table: step.table, orphaned, source }
        });
      }
    }
  }

  Ok(())
}

/// Undo `applied` in reverse order. Returns the tables whose compensation
/// failed. Failures are logged and never retried.
fn compensate(conn: &Connection, applied: &[&Step]) -> Vec<Table> {
  applied
    .iter()
    .rev()
    .filter_map(|step| {
      let undo = step.undo.as_ref()?;
      match execute(conn, undo.sql, &undo.params) {
        Ok(_) => {
          tracing::debug!(table = %step.table, "compensating delete applied");
          None
        }
        Err(e) => {
          tracing::error!(table = %step.table, error = %e, "compensating delete failed");
          Some(step.table)
        }
      }
    })
    .collect()
}

// ─── Partial updates ─────────────────────────────────────────────────────────

/// `SET` clauses for a partial update: only columns given a value appear.
///
/// Column names are always `'static` literals from the caller, never request
/// data; values are bound positionally.
#[derive(Default)]
pub struct Assignments {
  columns: Vec<&'static str>,
  values:  Vec<Value>,
}

impl Assignments {
  pub fn new() -> Self { Self::default() }

  pub fn set<T: Into<Value>>(mut self, column: &'static str, value: Option<T>) -> Self {
    if let Some(v) = value {
      self.columns.push(column);
      self.values.push(v.into());
    }
    self
  }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }

  /// Build `UPDATE table SET … WHERE k1 = ? AND …` and run it. Returns the
  /// number of rows changed.
  pub fn apply(
    self,
    conn: &Connection,
    table: Table,
    filter: Vec<(&'static str, Value)>,
  ) -> rusqlite::Result<usize> {
    let sql = self.sql(table, filter.iter().map(|(c, _)| *c));
    let mut values = self.values;
    values.extend(filter.into_iter().map(|(_, v)| v));
    execute(conn, &sql, &values)
  }

  fn sql<'a>(&self, table: Table, filter: impl Iterator<Item = &'a str>) -> String {
    let set = self
      .columns
      .iter()
      .enumerate()
      .map(|(i, c)| format!("{c} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let offset = self.columns.len();
    let conds = filter
      .enumerate()
      .map(|(i, c)| format!("{c} = ?{}", offset + i + 1))
      .collect::<Vec<_>>()
      .join(" AND ");
    format!("UPDATE {table} SET {set} WHERE {conds}")
  }
}
