//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Specializations are stored as a compact JSON array. Seniority is stored by
//! name, with its rank alongside for ordering.

use helpdesk_core::{
  case::SupportCase,
  person::{PersonStatus, Seniority, SupportPerson},
};
use rusqlite::types::Value;

use crate::{Error, Result};

pub const CASE_COLUMNS: &str = "case_id, title, description, owner, is_complete, \
                                assigned_support_person, assignment_reasoning";

pub const PERSON_COLUMNS: &str = "alias, name, email, specializations, current_workload, \
                                  average_resolution_time, customer_satisfaction_rating, \
                                  seniority, status";

// ─── PersonStatus ────────────────────────────────────────────────────────────

pub fn encode_status(s: PersonStatus) -> &'static str {
  match s {
    PersonStatus::Active => "active",
    PersonStatus::Deleted => "deleted",
  }
}

pub fn decode_status(s: &str) -> Result<PersonStatus> {
  match s {
    "active" => Ok(PersonStatus::Active),
    "deleted" => Ok(PersonStatus::Deleted),
    other => Err(Error::Decode(format!("unknown person status: {other:?}"))),
  }
}

// ─── Cases ───────────────────────────────────────────────────────────────────

/// Read a row selected with [`CASE_COLUMNS`].
pub fn case_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SupportCase> {
  Ok(SupportCase {
    id:                                  Some(row.get(0)?),
    title:                               row.get(1)?,
    description:                         row.get(2)?,
    owner:                               row.get(3)?,
    is_complete:                         row.get(4)?,
    assigned_support_person:             row.get(5)?,
    support_person_assignment_reasoning: row.get(6)?,
  })
}

/// Column values for everything but `case_id`, in [`CASE_COLUMNS`] order.
pub fn case_values(case: SupportCase) -> Vec<Value> {
  vec![
    Value::from(case.title),
    Value::from(case.description),
    Value::from(case.owner),
    Value::from(case.is_complete),
    Value::from(case.assigned_support_person),
    Value::from(case.support_person_assignment_reasoning),
  ]
}

// ─── Persons ─────────────────────────────────────────────────────────────────

/// A person row before column decoding.
pub struct RawPerson {
  pub alias:                        String,
  pub name:                         String,
  pub email:                        String,
  pub specializations:              String,
  pub current_workload:             i64,
  pub average_resolution_time:      Option<f64>,
  pub customer_satisfaction_rating: Option<f64>,
  pub seniority:                    String,
  pub status:                       String,
}

impl RawPerson {
  /// Read a row selected with [`PERSON_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      alias:                        row.get(0)?,
      name:                         row.get(1)?,
      email:                        row.get(2)?,
      specializations:              row.get(3)?,
      current_workload:             row.get(4)?,
      average_resolution_time:      row.get(5)?,
      customer_satisfaction_rating: row.get(6)?,
      seniority:                    row.get(7)?,
      status:                       row.get(8)?,
    })
  }

  pub fn into_person(self) -> Result<SupportPerson> {
    Ok(SupportPerson {
      alias:                        self.alias,
      name:                         self.name,
      email:                        self.email,
      specializations:              serde_json::from_str(&self.specializations)?,
      current_workload:             u32::try_from(self.current_workload).map_err(|_| {
        Error::Decode(format!("workload out of range: {}", self.current_workload))
      })?,
      average_resolution_time:      self.average_resolution_time,
      customer_satisfaction_rating: self.customer_satisfaction_rating,
      seniority:                    self
        .seniority
        .parse::<Seniority>()
        .map_err(|e| Error::Decode(e.to_string()))?,
      status:                       decode_status(&self.status)?,
    })
  }
}

/// Column values in [`PERSON_COLUMNS`] order, followed by `seniority_rank`.
pub fn person_values(person: SupportPerson) -> Result<Vec<Value>> {
  Ok(vec![
    Value::from(person.alias),
    Value::from(person.name),
    Value::from(person.email),
    Value::from(serde_json::to_string(&person.specializations)?),
    Value::from(i64::from(person.current_workload)),
    Value::from(person.average_resolution_time),
    Value::from(person.customer_satisfaction_rating),
    Value::from(person.seniority.as_str().to_owned()),
    Value::from(encode_status(person.status).to_owned()),
    Value::from(i64::from(person.seniority.rank())),
  ])
}
