use std::sync::Arc;

use crate::{
  Result,
  case::SupportCase,
  error::NotFoundFailure,
  observe::{NoopObserver, ServiceCall, ServiceObserver},
  query::{CaseFilter, CaseListFilter, CaseQuery, Page, PersonFilter},
  store::SupportStore,
  validate::{AssignmentPolicy, AssignmentValidator, ResolvedAssignee},
};

use super::{observed, store_err};

/// Case operations.
///
/// Every write re-checks the assignee against the person collection. The
/// check and the write are separate store calls; a person deleted in between
/// is an accepted race.
pub struct CaseService<S> {
  store:     Arc<S>,
  validator: AssignmentValidator,
  observer:  Arc<dyn ServiceObserver>,
}

impl<S: SupportStore> CaseService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      validator: AssignmentValidator::default(),
      observer: Arc::new(NoopObserver),
    }
  }

  pub fn with_policy(mut self, policy: AssignmentPolicy) -> Self {
    self.validator = AssignmentValidator::new(policy);
    self
  }

  pub fn with_observer(mut self, observer: Arc<dyn ServiceObserver>) -> Self {
    self.observer = observer;
    self
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Legacy listing: fixed pages of ten in insertion order, no filters.
  pub async fn list_cases_paged(&self, page_number: Option<i64>) -> Result<Vec<SupportCase>> {
    let query = CaseQuery { filter: CaseFilter::all(), page: Page::legacy(page_number) };
    let call = ServiceCall::new("list_cases_paged", "get");
    observed(self.observer.as_ref(), call, async {
      self.store.find_cases(&query).await.map_err(store_err)
    })
    .await
  }

  pub async fn list_cases_filtered(&self, filter: &CaseListFilter) -> Result<Vec<SupportCase>> {
    let query = filter.to_query();
    let call = ServiceCall::new("list_cases_filtered", "get with assignment filters");
    observed(self.observer.as_ref(), call, async {
      self.store.find_cases(&query).await.map_err(store_err)
    })
    .await
  }

  pub async fn get_case(&self, id: &str) -> Result<Option<SupportCase>> {
    let filter = CaseFilter::by_id(id);
    let call = ServiceCall::new("get_case", "get").entity(id);
    observed(self.observer.as_ref(), call, async {
      self.store.find_case(&filter).await.map_err(store_err)
    })
    .await
  }

  pub async fn count_cases(&self) -> Result<u64> {
    let filter = CaseFilter::all();
    let call = ServiceCall::new("count_cases", "count");
    observed(self.observer.as_ref(), call, async {
      self.store.count_cases(&filter).await.map_err(store_err)
    })
    .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Validate and insert a new case. Returns it with its assigned id.
  pub async fn create_case(&self, case: SupportCase) -> Result<SupportCase> {
    let mut call = ServiceCall::new("create_case", "insert");
    call.entity_id = case.id.clone();
    observed(self.observer.as_ref(), call, self.create_inner(case)).await
  }

  async fn create_inner(&self, case: SupportCase) -> Result<SupportCase> {
    self.check_assignment(None, &case).await?;
    let stored = self.store.insert_case(case).await.map_err(store_err)?;
    tracing::info!(id = stored.id.as_deref(), assignee = stored.assignee(), "support case created");
    Ok(stored)
  }

  /// Replace the case stored under `id` with `case` (full replace).
  ///
  /// Fails with `CASE_NOT_FOUND` if no such case exists.
  pub async fn update_case(&self, id: &str, case: SupportCase) -> Result<SupportCase> {
    let call = ServiceCall::new("update_case", "update").entity(id);
    observed(self.observer.as_ref(), call, self.update_inner(id, case)).await
  }

  async fn update_inner(&self, id: &str, mut case: SupportCase) -> Result<SupportCase> {
    let filter = CaseFilter::by_id(id);
    let existing = self
      .store
      .find_case(&filter)
      .await
      .map_err(store_err)?
      .ok_or_else(|| NotFoundFailure::case(id))?;

    self.check_assignment(Some(&existing), &case).await?;

    case.id = Some(id.to_owned());
    let matched = self.store.replace_case(&filter, case.clone()).await.map_err(store_err)?;
    if matched == 0 {
      // Deleted between the read and the write.
      return Err(NotFoundFailure::case(id).into());
    }
    tracing::info!(id, assignee = case.assignee(), "support case updated");
    Ok(case)
  }

  /// Hard-delete a case. Deleting an unknown id is not an error.
  pub async fn delete_case(&self, id: &str) -> Result<()> {
    let filter = CaseFilter::by_id(id);
    let call = ServiceCall::new("delete_case", "delete").entity(id);
    observed(self.observer.as_ref(), call, async {
      let removed = self.store.delete_cases(&filter).await.map_err(store_err)?;
      tracing::info!(id, removed, "support case deleted");
      Ok(())
    })
    .await
  }

  // ── Assignment checks ─────────────────────────────────────────────────────

  async fn check_assignment(&self, existing: Option<&SupportCase>, case: &SupportCase) -> Result<()> {
    let lookup = self.resolve_assignee(case.assignee()).await;
    self
      .validator
      .validate_assignment(existing, case.assigned_support_person.as_deref(), &lookup)?;
    self
      .validator
      .validate_reasoning(case.support_person_assignment_reasoning.as_deref())?;
    Ok(())
  }

  async fn resolve_assignee(&self, alias: Option<&str>) -> ResolvedAssignee {
    let Some(alias) = alias else {
      return ResolvedAssignee::Missing;
    };
    let result = self.store.find_person(&PersonFilter::by_alias(alias)).await;
    if let Err(e) = &result {
      tracing::warn!(alias, error = %e, "assignee lookup failed; rejecting assignment");
    }
    ResolvedAssignee::from_lookup(result)
  }
}
