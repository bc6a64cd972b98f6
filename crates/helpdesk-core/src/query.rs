//! Predicates, sort orders and pagination for listing cases and persons.
//!
//! Filters are conjunctions of [`CasePredicate`]s or [`PersonPredicate`]s.
//! Store backends either evaluate them directly (see
//! [`MemoryStore`](crate::memory::MemoryStore)) or compile them into their
//! own query language. Ties under any sort key keep insertion order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::{case::SupportCase, person::SupportPerson};

/// Hard cap on any requested page size.
pub const MAX_PAGE_LIMIT: usize = 100;
/// Page size used when a filtered listing does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 50;
/// Fixed page size of the legacy page-number listing.
pub const LEGACY_PAGE_SIZE: usize = 10;
/// Persons with a workload below this count as available.
pub const AVAILABILITY_THRESHOLD: u32 = 10;

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A skip/limit window. The limit is always clamped to [`MAX_PAGE_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub offset: usize,
  pub limit:  usize,
}

impl Page {
  pub fn new(offset: Option<usize>, limit: Option<usize>) -> Self {
    Self {
      offset: offset.unwrap_or(0),
      limit:  limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
    }
  }

  /// The window for a 1-based legacy page number. Missing, zero and negative
  /// page numbers all select the first page.
  pub fn legacy(page_number: Option<i64>) -> Self {
    let index = page_number.unwrap_or(1).max(1) - 1;
    let index = usize::try_from(index).unwrap_or(usize::MAX);
    Self { offset: index.saturating_mul(LEGACY_PAGE_SIZE), limit: LEGACY_PAGE_SIZE }
  }

  /// Apply this window to an already filtered and sorted sequence.
  pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
    items.into_iter().skip(self.offset).take(self.limit).collect()
  }
}

impl Default for Page {
  fn default() -> Self { Self::new(None, None) }
}

/// Pagination summary reported alongside a person listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  /// Number of matching records, ignoring offset and limit.
  pub total:        u64,
  pub limit:        usize,
  pub offset:       usize,
  pub has_next:     bool,
  pub has_previous: bool,
}

impl Pagination {
  pub fn new(total: u64, page: Page) -> Self {
    let end = page.offset.saturating_add(page.limit) as u64;
    Self {
      total,
      limit: page.limit,
      offset: page.offset,
      has_next: end < total,
      has_previous: page.offset > 0,
    }
  }
}

// ─── Case filters ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasePredicate {
  /// Case id equals the value.
  Id(String),
  /// Assignee equals the alias exactly.
  AssignedTo(String),
  /// Assignee is absent or empty.
  Unassigned,
  /// Assignee is present and non-empty.
  Assigned,
}

impl CasePredicate {
  pub fn matches(&self, case: &SupportCase) -> bool {
    match self {
      Self::Id(id) => case.id.as_deref() == Some(id.as_str()),
      Self::AssignedTo(alias) => case.assigned_support_person.as_deref() == Some(alias.as_str()),
      Self::Unassigned => !case.is_assigned(),
      Self::Assigned => case.is_assigned(),
    }
  }
}

/// A conjunction of case predicates. The empty filter matches every case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
  predicates: Vec<CasePredicate>,
}

impl CaseFilter {
  pub fn all() -> Self { Self::default() }

  pub fn by_id(id: impl Into<String>) -> Self { Self::all().and(CasePredicate::Id(id.into())) }

  pub fn and(mut self, predicate: CasePredicate) -> Self {
    self.predicates.push(predicate);
    self
  }

  pub fn predicates(&self) -> &[CasePredicate] { &self.predicates }

  pub fn matches(&self, case: &SupportCase) -> bool {
    self.predicates.iter().all(|p| p.matches(case))
  }
}

/// A case listing request. Cases are always returned in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseQuery {
  pub filter: CaseFilter,
  pub page:   Page,
}

/// Parameters of the filtered case listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseListFilter {
  pub assigned_to: Option<String>,
  /// `Some(true)` selects unassigned cases, `Some(false)` assigned ones.
  pub unassigned:  Option<bool>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

impl CaseListFilter {
  pub fn to_query(&self) -> CaseQuery {
    let mut filter = CaseFilter::all();
    if let Some(alias) = self.assigned_to.as_deref().filter(|a| !a.is_empty()) {
      filter = filter.and(CasePredicate::AssignedTo(alias.to_owned()));
    }
    match self.unassigned {
      Some(true) => filter = filter.and(CasePredicate::Unassigned),
      Some(false) => filter = filter.and(CasePredicate::Assigned),
      None => {}
    }
    CaseQuery { filter, page: Page::new(self.offset, self.limit) }
  }
}

// ─── Person filters ──────────────────────────────────────────────────────────

/// Whether soft-deleted persons are visible to a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
  #[default]
  ActiveOnly,
  /// Administrative override; normal reads never use it.
  IncludeDeleted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonPredicate {
  Alias(String),
  /// Alias differs from the value; used to exclude a person from its own
  /// uniqueness checks.
  NotAlias(String),
  Email(String),
  /// The specialization set contains the value.
  Specialization(String),
  /// Seniority name equals the value. Unknown names match nothing.
  Seniority(String),
  WorkloadBelow(u32),
}

impl PersonPredicate {
  pub fn matches(&self, person: &SupportPerson) -> bool {
    match self {
      Self::Alias(alias) => person.alias == *alias,
      Self::NotAlias(alias) => person.alias != *alias,
      Self::Email(email) => person.email == *email,
      Self::Specialization(s) => person.specializations.iter().any(|own| own == s),
      Self::Seniority(level) => person.seniority.as_str() == level,
      Self::WorkloadBelow(n) => person.current_workload < *n,
    }
  }
}

/// A conjunction of person predicates, scoped to active persons unless
/// explicitly widened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonFilter {
  visibility: Visibility,
  predicates: Vec<PersonPredicate>,
}

impl PersonFilter {
  pub fn active() -> Self { Self::default() }

  pub fn including_deleted() -> Self {
    Self { visibility: Visibility::IncludeDeleted, predicates: Vec::new() }
  }

  /// Active person with this alias.
  pub fn by_alias(alias: impl Into<String>) -> Self {
    Self::active().and(PersonPredicate::Alias(alias.into()))
  }

  pub fn and(mut self, predicate: PersonPredicate) -> Self {
    self.predicates.push(predicate);
    self
  }

  pub fn visibility(&self) -> Visibility { self.visibility }

  pub fn predicates(&self) -> &[PersonPredicate] { &self.predicates }

  pub fn matches(&self, person: &SupportPerson) -> bool {
    (self.visibility == Visibility::IncludeDeleted || person.is_active())
      && self.predicates.iter().all(|p| p.matches(person))
  }
}

// ─── Person sorting ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersonSortKey {
  #[default]
  Name,
  Seniority,
  Workload,
  Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonSort {
  pub key:       PersonSortKey,
  pub direction: SortDirection,
}

impl PersonSort {
  /// Interpret caller-supplied sort parameters.
  ///
  /// Keys are matched case-insensitively. An unrecognised key falls back to
  /// ascending by name, whatever direction was asked for. Any direction other
  /// than `asc` sorts descending.
  pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
    let direction = match sort_order {
      None => SortDirection::Asc,
      Some(o) if o.eq_ignore_ascii_case("asc") => SortDirection::Asc,
      Some(_) => SortDirection::Desc,
    };
    let key = match sort_by.map(str::to_ascii_lowercase).as_deref() {
      None | Some("name") => PersonSortKey::Name,
      Some("seniority") => PersonSortKey::Seniority,
      Some("workload") => PersonSortKey::Workload,
      Some("rating") => PersonSortKey::Rating,
      Some(_) => return Self::default(),
    };
    Self { key, direction }
  }

  /// Compare two persons on the sort key only, in the requested direction.
  /// Missing ratings sort before any rating when ascending.
  pub fn compare(&self, a: &SupportPerson, b: &SupportPerson) -> Ordering {
    let ord = self.key_order(a, b);
    match self.direction {
      SortDirection::Asc => ord,
      SortDirection::Desc => ord.reverse(),
    }
  }

  /// Stable sort. Ascending keeps equal keys in input order; descending is
  /// the exact reverse of ascending, so ties come out in reverse input order.
  pub fn sort(&self, persons: &mut [SupportPerson]) {
    persons.sort_by(|a, b| self.key_order(a, b));
    if self.direction == SortDirection::Desc {
      persons.reverse();
    }
  }

  fn key_order(&self, a: &SupportPerson, b: &SupportPerson) -> Ordering {
    match self.key {
      PersonSortKey::Name => a.name.cmp(&b.name),
      PersonSortKey::Seniority => a.seniority.rank().cmp(&b.seniority.rank()),
      PersonSortKey::Workload => a.current_workload.cmp(&b.current_workload),
      PersonSortKey::Rating => {
        match (a.customer_satisfaction_rating, b.customer_satisfaction_rating) {
          (None, None) => Ordering::Equal,
          (None, Some(_)) => Ordering::Less,
          (Some(_), None) => Ordering::Greater,
          (Some(x), Some(y)) => x.total_cmp(&y),
        }
      }
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonQuery {
  pub filter: PersonFilter,
  pub sort:   PersonSort,
  pub page:   Page,
}

/// Parameters of the person listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonListFilter {
  pub specialization: Option<String>,
  pub seniority:      Option<String>,
  /// `Some(true)` restricts to persons under [`AVAILABILITY_THRESHOLD`].
  pub available:      Option<bool>,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
  pub sort_by:        Option<String>,
  pub sort_order:     Option<String>,
}

impl PersonListFilter {
  pub fn to_query(&self) -> PersonQuery {
    let mut filter = PersonFilter::active();
    if let Some(s) = self.specialization.as_deref().filter(|s| !s.is_empty()) {
      filter = filter.and(PersonPredicate::Specialization(s.to_owned()));
    }
    if let Some(level) = self.seniority.as_deref().filter(|s| !s.is_empty()) {
      filter = filter.and(PersonPredicate::Seniority(level.to_owned()));
    }
    if self.available == Some(true) {
      filter = filter.and(PersonPredicate::WorkloadBelow(AVAILABILITY_THRESHOLD));
    }
    PersonQuery {
      filter,
      sort: PersonSort::parse(self.sort_by.as_deref(), self.sort_order.as_deref()),
      page: Page::new(self.offset, self.limit),
    }
  }
}

/// One page of persons plus the pagination summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPage {
  pub items:      Vec<SupportPerson>,
  pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::{PersonStatus, Seniority};

  fn person(alias: &str, name: &str, seniority: Seniority, workload: u32) -> SupportPerson {
    SupportPerson {
      alias:                        alias.into(),
      name:                         name.into(),
      email:                        format!("{alias}@example.com"),
      specializations:              vec!["Database".into()],
      current_workload:             workload,
      average_resolution_time:      None,
      customer_satisfaction_rating: None,
      seniority,
      status:                       PersonStatus::Active,
    }
  }

  // ── Page ──────────────────────────────────────────────────────────────────

  #[test]
  fn limit_is_clamped_to_maximum() {
    assert_eq!(Page::new(None, Some(500)).limit, MAX_PAGE_LIMIT);
    assert_eq!(Page::new(None, Some(7)).limit, 7);
    assert_eq!(Page::new(None, None).limit, DEFAULT_PAGE_LIMIT);
  }

  #[test]
  fn legacy_page_number_floors_at_first_page() {
    assert_eq!(Page::legacy(Some(1)), Page::legacy(Some(0)));
    assert_eq!(Page::legacy(Some(-4)), Page::legacy(Some(1)));
    assert_eq!(Page::legacy(None), Page { offset: 0, limit: 10 });
    assert_eq!(Page::legacy(Some(3)), Page { offset: 20, limit: 10 });
  }

  #[test]
  fn legacy_page_number_saturates() {
    let page = Page::legacy(Some(i64::MAX));
    assert_eq!(page.limit, LEGACY_PAGE_SIZE);
    assert!(page.offset > 0);
  }

  #[test]
  fn pagination_flags() {
    let p = Pagination::new(25, Page { offset: 20, limit: 10 });
    assert!(!p.has_next);
    assert!(p.has_previous);

    let p = Pagination::new(25, Page { offset: 0, limit: 10 });
    assert!(p.has_next);
    assert!(!p.has_previous);

    let p = Pagination::new(20, Page { offset: 10, limit: 10 });
    assert!(!p.has_next);
    assert!(p.has_previous);

    let p = Pagination::new(0, Page::default());
    assert!(!p.has_next);
    assert!(!p.has_previous);
  }

  // ── Case filters ──────────────────────────────────────────────────────────

  #[test]
  fn unassigned_filter_treats_empty_string_as_unassigned() {
    let none = SupportCase::default();
    let empty = SupportCase { assigned_support_person: Some(String::new()), ..Default::default() };
    let set = SupportCase { assigned_support_person: Some("jdoe".into()), ..Default::default() };

    let unassigned = CaseListFilter { unassigned: Some(true), ..Default::default() }.to_query();
    assert!(unassigned.filter.matches(&none));
    assert!(unassigned.filter.matches(&empty));
    assert!(!unassigned.filter.matches(&set));

    let assigned = CaseListFilter { unassigned: Some(false), ..Default::default() }.to_query();
    assert!(!assigned.filter.matches(&none));
    assert!(!assigned.filter.matches(&empty));
    assert!(assigned.filter.matches(&set));
  }

  #[test]
  fn empty_assigned_to_adds_no_predicate() {
    let q = CaseListFilter { assigned_to: Some(String::new()), ..Default::default() }.to_query();
    assert!(q.filter.predicates().is_empty());
  }

  // ── Person filters ────────────────────────────────────────────────────────

  #[test]
  fn person_filter_hides_deleted_by_default() {
    let mut p = person("jdoe", "Jane", Seniority::Senior, 0);
    p.status = PersonStatus::Deleted;
    assert!(!PersonFilter::active().matches(&p));
    assert!(PersonFilter::including_deleted().matches(&p));
  }

  #[test]
  fn availability_uses_threshold() {
    let q = PersonListFilter { available: Some(true), ..Default::default() }.to_query();
    assert!(q.filter.matches(&person("a", "A", Seniority::Junior, 9)));
    assert!(!q.filter.matches(&person("b", "B", Seniority::Junior, 10)));

    let q = PersonListFilter { available: Some(false), ..Default::default() }.to_query();
    assert!(q.filter.matches(&person("b", "B", Seniority::Junior, 10)));
  }

  #[test]
  fn unknown_seniority_matches_nothing() {
    let q = PersonListFilter { seniority: Some("Intern".into()), ..Default::default() }.to_query();
    for level in Seniority::ALL {
      assert!(!q.filter.matches(&person("a", "A", level, 0)));
    }
  }

  // ── Sorting ───────────────────────────────────────────────────────────────

  #[test]
  fn unrecognised_sort_key_falls_back_to_name_ascending() {
    let sort = PersonSort::parse(Some("shoe_size"), Some("desc"));
    assert_eq!(sort, PersonSort { key: PersonSortKey::Name, direction: SortDirection::Asc });
  }

  #[test]
  fn sort_parameters_are_case_insensitive() {
    let sort = PersonSort::parse(Some("Workload"), Some("ASC"));
    assert_eq!(sort, PersonSort { key: PersonSortKey::Workload, direction: SortDirection::Asc });
    let sort = PersonSort::parse(Some("rating"), Some("descending"));
    assert_eq!(sort.direction, SortDirection::Desc);
  }

  #[test]
  fn seniority_sort_reverses_with_direction() {
    let mut people = vec![
      person("c", "C", Seniority::Lead, 0),
      person("a", "A", Seniority::Junior, 0),
      person("e", "E", Seniority::Manager, 0),
      person("b", "B", Seniority::MidLevel, 0),
      person("d", "D", Seniority::Senior, 0),
    ];

    PersonSort::parse(Some("seniority"), Some("asc")).sort(&mut people);
    let asc: Vec<_> = people.iter().map(|p| p.alias.clone()).collect();

    PersonSort::parse(Some("seniority"), Some("desc")).sort(&mut people);
    let mut desc: Vec<_> = people.iter().map(|p| p.alias.clone()).collect();

    assert_eq!(asc, vec!["a", "b", "d", "c", "e"]);
    desc.reverse();
    assert_eq!(asc, desc);
  }

  #[test]
  fn ties_reverse_with_direction() {
    let input = vec![
      person("first", "Same", Seniority::Senior, 3),
      person("second", "Same", Seniority::Senior, 3),
      person("third", "Same", Seniority::Senior, 3),
    ];
    let sorted = |order: &str| {
      let mut people = input.clone();
      PersonSort::parse(Some("workload"), Some(order)).sort(&mut people);
      people.into_iter().map(|p| p.alias).collect::<Vec<_>>()
    };
    assert_eq!(sorted("asc"), ["first", "second", "third"]);
    assert_eq!(sorted("desc"), ["third", "second", "first"]);
  }

  #[test]
  fn descending_is_reverse_of_ascending_with_tied_levels() {
    let input = vec![
      person("s1", "S1", Seniority::Senior, 0),
      person("s2", "S2", Seniority::Senior, 0),
      person("j", "J", Seniority::Junior, 0),
    ];
    let sorted = |order: &str| {
      let mut people = input.clone();
      PersonSort::parse(Some("seniority"), Some(order)).sort(&mut people);
      people.into_iter().map(|p| p.alias).collect::<Vec<_>>()
    };
    let asc = sorted("asc");
    let mut desc = sorted("desc");
    assert_eq!(asc, ["j", "s1", "s2"]);
    desc.reverse();
    assert_eq!(asc, desc);
  }

  #[test]
  fn missing_ratings_sort_first_ascending() {
    let mut rated = person("rated", "R", Seniority::Junior, 0);
    rated.customer_satisfaction_rating = Some(4.5);
    let unrated = person("unrated", "U", Seniority::Junior, 0);

    let mut people = vec![rated, unrated];
    PersonSort::parse(Some("rating"), None).sort(&mut people);
    assert_eq!(people[0].alias, "unrated");

    PersonSort::parse(Some("rating"), Some("desc")).sort(&mut people);
    assert_eq!(people[0].alias, "rated");
  }
}
