//! Compiles core filters and sort orders into SQL fragments with bound
//! parameters.

use helpdesk_core::{
  person::PersonStatus,
  query::{
    CaseFilter, CasePredicate, PersonFilter, PersonPredicate, PersonSort, PersonSortKey,
    SortDirection, Visibility,
  },
};
use rusqlite::types::Value;

use crate::encode::encode_status;

/// A `WHERE` clause and the values for its `?` placeholders, in order.
#[derive(Debug, Default)]
pub struct Where {
  conditions: Vec<&'static str>,
  pub params: Vec<Value>,
}

impl Where {
  fn bind(&mut self, condition: &'static str, value: impl Into<Value>) {
    self.conditions.push(condition);
    self.params.push(value.into());
  }

  fn test(&mut self, condition: &'static str) { self.conditions.push(condition); }

  /// `WHERE a AND b ...`, or nothing for an empty filter.
  pub fn sql(&self) -> String {
    if self.conditions.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.conditions.join(" AND "))
    }
  }
}

pub fn cases(filter: &CaseFilter) -> Where {
  let mut w = Where::default();
  for predicate in filter.predicates() {
    match predicate {
      CasePredicate::Id(id) => w.bind("case_id = ?", id.clone()),
      CasePredicate::AssignedTo(alias) => w.bind("assigned_support_person = ?", alias.clone()),
      CasePredicate::Unassigned => {
        w.test("(assigned_support_person IS NULL OR assigned_support_person = '')");
      }
      CasePredicate::Assigned => {
        w.test("(assigned_support_person IS NOT NULL AND assigned_support_person <> '')");
      }
    }
  }
  w
}

pub fn persons(filter: &PersonFilter) -> Where {
  let mut w = Where::default();
  if filter.visibility() == Visibility::ActiveOnly {
    w.bind("status = ?", encode_status(PersonStatus::Active).to_owned());
  }
  for predicate in filter.predicates() {
    match predicate {
      PersonPredicate::Alias(alias) => w.bind("alias = ?", alias.clone()),
      PersonPredicate::NotAlias(alias) => w.bind("alias <> ?", alias.clone()),
      PersonPredicate::Email(email) => w.bind("email = ?", email.clone()),
      PersonPredicate::Specialization(s) => w.bind(
        "EXISTS (SELECT 1 FROM json_each(support_persons.specializations) WHERE json_each.value = ?)",
        s.clone(),
      ),
      PersonPredicate::Seniority(level) => w.bind("seniority = ?", level.clone()),
      PersonPredicate::WorkloadBelow(n) => w.bind("current_workload < ?", i64::from(*n)),
    }
  }
  w
}

/// `ORDER BY` body for a person sort. Ties fall back to insertion order in
/// the same direction as the key, so a descending listing is the exact
/// reverse of the ascending one. SQLite orders NULL ratings first ascending
/// and last descending.
pub fn person_order(sort: PersonSort) -> String {
  let column = match sort.key {
    PersonSortKey::Name => "name",
    PersonSortKey::Seniority => "seniority_rank",
    PersonSortKey::Workload => "current_workload",
    PersonSortKey::Rating => "customer_satisfaction_rating",
  };
  let direction = match sort.direction {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  };
  format!("{column} {direction}, seq {direction}")
}
