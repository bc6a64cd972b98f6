//! In-process [`SupportStore`] used when no database is configured, and by
//! tests.
//!
//! Each collection sits behind its own [`RwLock`]: every mutation (including
//! id assignment) holds the write lock for its whole read-modify-write, while
//! reads share the lock with each other.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
  case::SupportCase,
  person::{PersonStatus, SupportPerson},
  query::{CaseFilter, CaseQuery, PersonFilter, PersonQuery},
  store::SupportStore,
};

#[derive(Debug, Error)]
pub enum MemoryError {
  /// An insert would create a second document with the same key (case id,
  /// or alias among active persons).
  #[error("duplicate key: {0}")]
  DuplicateKey(String),
}

#[derive(Debug, Default)]
struct CaseCollection {
  next_id: u64,
  docs:    Vec<SupportCase>,
}

impl CaseCollection {
  fn contains_id(&self, id: &str) -> bool {
    self.docs.iter().any(|c| c.id.as_deref() == Some(id))
  }

  fn allocate_id(&mut self) -> String {
    loop {
      self.next_id += 1;
      let id = self.next_id.to_string();
      if !self.contains_id(&id) {
        return id;
      }
    }
  }
}

/// A [`SupportStore`] holding both collections in memory.
///
/// Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  cases:   Arc<RwLock<CaseCollection>>,
  persons: Arc<RwLock<Vec<SupportPerson>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl SupportStore for MemoryStore {
  type Error = MemoryError;

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn find_cases<'a>(&'a self, query: &'a CaseQuery) -> Result<Vec<SupportCase>, MemoryError> {
    let cases = self.cases.read().await;
    Ok(query.page.slice(cases.docs.iter().filter(|c| query.filter.matches(c)).cloned()))
  }

  async fn find_case<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> Result<Option<SupportCase>, MemoryError> {
    let cases = self.cases.read().await;
    Ok(cases.docs.iter().find(|c| filter.matches(c)).cloned())
  }

  async fn count_cases<'a>(&'a self, filter: &'a CaseFilter) -> Result<u64, MemoryError> {
    let cases = self.cases.read().await;
    Ok(cases.docs.iter().filter(|c| filter.matches(c)).count() as u64)
  }

  async fn insert_case(&self, mut case: SupportCase) -> Result<SupportCase, MemoryError> {
    let mut cases = self.cases.write().await;
    match case.id.clone().filter(|id| !id.trim().is_empty()) {
      Some(id) => {
        if cases.contains_id(&id) {
          return Err(MemoryError::DuplicateKey(id));
        }
      }
      None => case.id = Some(cases.allocate_id()),
    }
    cases.docs.push(case.clone());
    Ok(case)
  }

  async fn replace_case<'a>(
    &'a self,
    filter: &'a CaseFilter,
    case: SupportCase,
  ) -> Result<u64, MemoryError> {
    let mut cases = self.cases.write().await;
    match cases.docs.iter_mut().find(|c| filter.matches(c)) {
      Some(slot) => {
        *slot = case;
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn delete_cases<'a>(&'a self, filter: &'a CaseFilter) -> Result<u64, MemoryError> {
    let mut cases = self.cases.write().await;
    let before = cases.docs.len();
    cases.docs.retain(|c| !filter.matches(c));
    Ok((before - cases.docs.len()) as u64)
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn find_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> Result<Vec<SupportPerson>, MemoryError> {
    let mut matched: Vec<SupportPerson> = {
      let persons = self.persons.read().await;
      persons.iter().filter(|p| query.filter.matches(p)).cloned().collect()
    };
    query.sort.sort(&mut matched);
    Ok(query.page.slice(matched))
  }

  async fn find_person<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> Result<Option<SupportPerson>, MemoryError> {
    let persons = self.persons.read().await;
    Ok(persons.iter().find(|p| filter.matches(p)).cloned())
  }

  async fn count_persons<'a>(&'a self, filter: &'a PersonFilter) -> Result<u64, MemoryError> {
    let persons = self.persons.read().await;
    Ok(persons.iter().filter(|p| filter.matches(p)).count() as u64)
  }

  async fn insert_person(&self, person: SupportPerson) -> Result<(), MemoryError> {
    let mut persons = self.persons.write().await;
    if person.is_active() && persons.iter().any(|p| p.is_active() && p.alias == person.alias) {
      return Err(MemoryError::DuplicateKey(person.alias));
    }
    persons.push(person);
    Ok(())
  }

  async fn replace_person<'a>(
    &'a self,
    filter: &'a PersonFilter,
    person: SupportPerson,
  ) -> Result<u64, MemoryError> {
    let mut persons = self.persons.write().await;
    match persons.iter_mut().find(|p| filter.matches(p)) {
      Some(slot) => {
        *slot = person;
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn set_person_status<'a>(
    &'a self,
    filter: &'a PersonFilter,
    status: PersonStatus,
  ) -> Result<u64, MemoryError> {
    let mut persons = self.persons.write().await;
    match persons.iter_mut().find(|p| filter.matches(p)) {
      Some(slot) => {
        slot.status = status;
        Ok(1)
      }
      None => Ok(0),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::{person::Seniority, query::PersonPredicate};

  fn person(alias: &str) -> SupportPerson {
    SupportPerson {
      alias:                        alias.into(),
      name:                         alias.to_uppercase(),
      email:                        format!("{alias}@example.com"),
      specializations:              vec!["Hardware".into()],
      current_workload:             0,
      average_resolution_time:      None,
      customer_satisfaction_rating: None,
      seniority:                    Seniority::Junior,
      status:                       PersonStatus::Active,
    }
  }

  #[tokio::test]
  async fn assigns_sequential_ids() {
    let s = MemoryStore::new();
    let a = s.insert_case(SupportCase::default()).await.unwrap();
    let b = s.insert_case(SupportCase { id: Some("  ".into()), ..Default::default() }).await.unwrap();
    assert_eq!(a.id.as_deref(), Some("1"));
    assert_eq!(b.id.as_deref(), Some("2"));
  }

  #[tokio::test]
  async fn generated_ids_skip_caller_supplied_ones() {
    let s = MemoryStore::new();
    s.insert_case(SupportCase { id: Some("1".into()), ..Default::default() }).await.unwrap();
    let generated = s.insert_case(SupportCase::default()).await.unwrap();
    assert_eq!(generated.id.as_deref(), Some("2"));
  }

  #[tokio::test]
  async fn duplicate_case_id_is_rejected() {
    let s = MemoryStore::new();
    let case = SupportCase { id: Some("abc".into()), ..Default::default() };
    s.insert_case(case.clone()).await.unwrap();
    let err = s.insert_case(case).await.unwrap_err();
    assert!(matches!(err, MemoryError::DuplicateKey(id) if id == "abc"));
  }

  #[tokio::test]
  async fn concurrent_inserts_get_unique_ids() {
    let s = MemoryStore::new();
    let handles: Vec<_> = (0..50)
      .map(|_| {
        let s = s.clone();
        tokio::spawn(async move { s.insert_case(SupportCase::default()).await.unwrap() })
      })
      .collect();

    let mut ids = HashSet::new();
    for h in handles {
      ids.insert(h.await.unwrap().id.unwrap());
    }
    assert_eq!(ids.len(), 50);
    assert_eq!(s.count_cases(&CaseFilter::all()).await.unwrap(), 50);
  }

  #[tokio::test]
  async fn replace_keeps_insertion_position() {
    let s = MemoryStore::new();
    for _ in 0..3 {
      s.insert_case(SupportCase::default()).await.unwrap();
    }
    let replacement = SupportCase { id: Some("2".into()), title: Some("edited".into()), ..Default::default() };
    assert_eq!(s.replace_case(&CaseFilter::by_id("2"), replacement).await.unwrap(), 1);
    assert_eq!(s.replace_case(&CaseFilter::by_id("9"), SupportCase::default()).await.unwrap(), 0);

    let all = s.find_cases(&CaseQuery::default()).await.unwrap();
    assert_eq!(all[1].title.as_deref(), Some("edited"));
  }

  #[tokio::test]
  async fn active_alias_is_unique_but_deleted_alias_is_reusable() {
    let s = MemoryStore::new();
    s.insert_person(person("jdoe")).await.unwrap();
    assert!(s.insert_person(person("jdoe")).await.is_err());

    let matched = s
      .set_person_status(&PersonFilter::by_alias("jdoe"), PersonStatus::Deleted)
      .await
      .unwrap();
    assert_eq!(matched, 1);
    s.insert_person(person("jdoe")).await.unwrap();

    let every = PersonFilter::including_deleted().and(PersonPredicate::Alias("jdoe".into()));
    assert_eq!(s.count_persons(&every).await.unwrap(), 2);
    assert_eq!(s.count_persons(&PersonFilter::by_alias("jdoe")).await.unwrap(), 1);
  }
}
