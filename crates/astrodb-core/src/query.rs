//! Read-side query types: the authored projection and the fixed analytical
//! reports.

use std::{collections::BTreeSet, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Authored projection ─────────────────────────────────────────────────────

/// A column that may be projected from `authored ⋈ astronomer`.
///
/// This enum is the allow-list: only these variants ever reach SQL, and each
/// maps to a fixed qualified column name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthoredColumn {
  AstId,
  ThName,
  PhName,
  AstName,
}

impl AuthoredColumn {
  /// Qualified SQL column for this projection.
  pub fn sql(self) -> &'static str {
    match self {
      AuthoredColumn::AstId => "au.ast_id",
      AuthoredColumn::ThName => "au.th_name",
      AuthoredColumn::PhName => "au.ph_name",
      AuthoredColumn::AstName => "ast.ast_name",
    }
  }
}

/// A validated, non-empty set of projected columns.
///
/// Iteration order is the enum's declaration order, so the SELECT list is
/// stable regardless of how the request listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredProjection(BTreeSet<AuthoredColumn>);

impl AuthoredProjection {
  pub fn new(columns: impl IntoIterator<Item = AuthoredColumn>) -> Result<Self> {
    let set: BTreeSet<_> = columns.into_iter().collect();
    if set.is_empty() {
      return Err(Error::EmptyProjection);
    }
    Ok(Self(set))
  }

  /// Parse a comma-separated list such as `"ast_id,ast_name"`.
  pub fn parse_list(s: &str) -> Result<Self> {
    let columns = s
      .split(',')
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .map(|c| {
        AuthoredColumn::from_str(c).map_err(|_| Error::UnknownColumn(c.to_owned()))
      })
      .collect::<Result<Vec<_>>>()?;
    Self::new(columns)
  }

  pub fn columns(&self) -> impl Iterator<Item = AuthoredColumn> + '_ {
    self.0.iter().copied()
  }

  pub fn contains(&self, column: AuthoredColumn) -> bool { self.0.contains(&column) }

  /// The comma-joined SELECT list.
  pub fn select_list(&self) -> String {
    self.columns().map(AuthoredColumn::sql).collect::<Vec<_>>().join(", ")
  }
}

/// One projected row; unselected columns are `None` and omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoredRow {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ast_id:   Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub th_name:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ph_name:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ast_name: Option<String>,
}

// ─── Analytical reports ──────────────────────────────────────────────────────

/// The most distant body pictured through an observatory's telescopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarthestBody {
  pub obs_id:   i64,
  pub obs_name: String,
  pub cb_name:  String,
  pub distance: f64,
}

/// An observatory housing two or more telescopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeCount {
  pub obs_id:                i64,
  pub earliest_manufactured: NaiveDate,
  pub telescopes:            i64,
}

/// An observatory identity pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservatoryRef {
  pub obs_id:   i64,
  pub obs_name: String,
}
