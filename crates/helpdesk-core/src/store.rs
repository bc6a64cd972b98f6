//! The `SupportStore` trait: the document-store adapter the services run on.
//!
//! The trait is implemented by storage backends ([`MemoryStore`] here,
//! `helpdesk-store-sqlite` for durable storage). Backends are trusted for
//! durability and isolation of single calls only: there are no
//! multi-document transactions, and the services never assume that two calls
//! observe the same snapshot.
//!
//! [`MemoryStore`]: crate::memory::MemoryStore

use std::future::Future;

use crate::{
  case::SupportCase,
  person::{PersonStatus, SupportPerson},
  query::{CaseFilter, CaseQuery, PersonFilter, PersonQuery},
};

/// Abstraction over the case and person collections.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SupportStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// Cases matching `query.filter` in insertion order, windowed by
  /// `query.page`.
  fn find_cases<'a>(
    &'a self,
    query: &'a CaseQuery,
  ) -> impl Future<Output = Result<Vec<SupportCase>, Self::Error>> + Send + 'a;

  /// The first case matching `filter`, if any.
  fn find_case<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> impl Future<Output = Result<Option<SupportCase>, Self::Error>> + Send + 'a;

  fn count_cases<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Persist a new case, assigning an id when `case.id` is absent or blank.
  /// Returns the stored case.
  fn insert_case(
    &self,
    case: SupportCase,
  ) -> impl Future<Output = Result<SupportCase, Self::Error>> + Send + '_;

  /// Replace the first case matching `filter`. Returns the matched count
  /// (0 or 1).
  fn replace_case<'a>(
    &'a self,
    filter: &'a CaseFilter,
    case: SupportCase,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Hard-delete every case matching `filter`. Returns the deleted count.
  fn delete_cases<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Persons matching `query.filter`, sorted by `query.sort` (ties in
  /// insertion order) and windowed by `query.page`.
  fn find_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<SupportPerson>, Self::Error>> + Send + 'a;

  /// The first person (in insertion order) matching `filter`, if any.
  fn find_person<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> impl Future<Output = Result<Option<SupportPerson>, Self::Error>> + Send + 'a;

  fn count_persons<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  fn insert_person(
    &self,
    person: SupportPerson,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the first person matching `filter`. Returns the matched count
  /// (0 or 1).
  fn replace_person<'a>(
    &'a self,
    filter: &'a PersonFilter,
    person: SupportPerson,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Set the status field of the first person matching `filter`. Returns the
  /// matched count (0 or 1).
  fn set_person_status<'a>(
    &'a self,
    filter: &'a PersonFilter,
    status: PersonStatus,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
