//! Support persons: staff members cases can be assigned to.
//!
//! Persons are never physically removed. Deleting one flips its
//! [`PersonStatus`] to `Deleted`, after which it is invisible to every normal
//! read and can no longer be assigned.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Seniority ───────────────────────────────────────────────────────────────

/// Seniority level, ordered from most junior to most senior.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Seniority {
  Junior,
  MidLevel,
  Senior,
  Lead,
  Manager,
}

impl Seniority {
  pub const ALL: [Seniority; 5] =
    [Self::Junior, Self::MidLevel, Self::Senior, Self::Lead, Self::Manager];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Junior => "Junior",
      Self::MidLevel => "MidLevel",
      Self::Senior => "Senior",
      Self::Lead => "Lead",
      Self::Manager => "Manager",
    }
  }

  /// Position in the seniority ladder; used as the sort key.
  pub fn rank(self) -> u8 {
    match self {
      Self::Junior => 0,
      Self::MidLevel => 1,
      Self::Senior => 2,
      Self::Lead => 3,
      Self::Manager => 4,
    }
  }
}

impl fmt::Display for Seniority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown seniority level: {0:?}")]
pub struct UnknownSeniority(pub String);

impl FromStr for Seniority {
  type Err = UnknownSeniority;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|level| level.as_str() == s)
      .ok_or_else(|| UnknownSeniority(s.to_owned()))
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonStatus {
  #[default]
  Active,
  /// Soft-deleted.
  Deleted,
}

impl PersonStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A validated, stored support person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportPerson {
  /// Unique among active persons; immutable after creation.
  pub alias:                        String,
  pub name:                         String,
  /// Unique among active persons.
  pub email:                        String,
  pub specializations:              Vec<String>,
  /// Open cases currently handled, 0–100.
  pub current_workload:             u32,
  pub average_resolution_time:      Option<f64>,
  pub customer_satisfaction_rating: Option<f64>,
  pub seniority:                    Seniority,
  #[serde(default)]
  pub status:                       PersonStatus,
}

impl SupportPerson {
  pub fn is_active(&self) -> bool { self.status.is_active() }
}

/// Unvalidated person payload as received from a caller.
///
/// Every field is loose so that the validator, not the deserialiser, decides
/// what is wrong and can report all violations at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportPersonInput {
  pub alias:                        Option<String>,
  pub name:                         Option<String>,
  pub email:                        Option<String>,
  #[serde(default)]
  pub specializations:              Vec<String>,
  #[serde(default)]
  pub current_workload:             i64,
  pub average_resolution_time:      Option<f64>,
  pub customer_satisfaction_rating: Option<f64>,
  pub seniority:                    Option<String>,
}

impl From<SupportPerson> for SupportPersonInput {
  fn from(p: SupportPerson) -> Self {
    Self {
      alias:                        Some(p.alias),
      name:                         Some(p.name),
      email:                        Some(p.email),
      specializations:              p.specializations,
      current_workload:             i64::from(p.current_workload),
      average_resolution_time:      p.average_resolution_time,
      customer_satisfaction_rating: p.customer_satisfaction_rating,
      seniority:                    Some(p.seniority.as_str().to_owned()),
    }
  }
}
