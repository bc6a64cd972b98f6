use std::sync::Arc;

use crate::{
  Result,
  error::{
    AssignmentConflict, ConflictCode, ConflictFailure, FieldError, NotFoundFailure,
    ValidationFailure,
  },
  observe::{NoopObserver, ServiceCall, ServiceObserver},
  person::{PersonStatus, SupportPerson, SupportPersonInput},
  query::{
    CaseFilter, CasePredicate, CaseQuery, Page, Pagination, PersonFilter, PersonListFilter,
    PersonPage, PersonPredicate,
  },
  store::SupportStore,
  validate::{ValidationMode, validate_person},
};

use super::{observed, store_err};

/// How many referencing case ids a delete conflict reports.
const CONFLICT_SAMPLE_SIZE: usize = 3;

/// Support person operations. Every read sees active persons only.
pub struct PersonService<S> {
  store:    Arc<S>,
  observer: Arc<dyn ServiceObserver>,
}

impl<S: SupportStore> PersonService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store, observer: Arc::new(NoopObserver) } }

  pub fn with_observer(mut self, observer: Arc<dyn ServiceObserver>) -> Self {
    self.observer = observer;
    self
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Filter, sort and window the active persons. The total ignores the
  /// window.
  pub async fn list_persons(&self, filter: &PersonListFilter) -> Result<PersonPage> {
    let query = filter.to_query();
    let call = ServiceCall::new("list_persons", "get with filters");
    observed(self.observer.as_ref(), call, async {
      let items = self.store.find_persons(&query).await.map_err(store_err)?;
      let total = self.store.count_persons(&query.filter).await.map_err(store_err)?;
      Ok(PersonPage { items, pagination: Pagination::new(total, query.page) })
    })
    .await
  }

  pub async fn get_person(&self, alias: &str) -> Result<Option<SupportPerson>> {
    let filter = PersonFilter::by_alias(alias);
    let call = ServiceCall::new("get_person", "get").entity(alias);
    observed(self.observer.as_ref(), call, async {
      self.store.find_person(&filter).await.map_err(store_err)
    })
    .await
  }

  pub async fn exists(&self, alias: &str) -> Result<bool> {
    let filter = PersonFilter::by_alias(alias);
    let call = ServiceCall::new("exists", "count").entity(alias);
    observed(self.observer.as_ref(), call, async {
      Ok(self.store.count_persons(&filter).await.map_err(store_err)? > 0)
    })
    .await
  }

  /// Whether any case, complete or not, references `alias`.
  pub async fn has_active_assignments(&self, alias: &str) -> Result<bool> {
    let filter = assigned_to(alias);
    let call = ServiceCall::new("has_active_assignments", "count cases").entity(alias);
    observed(self.observer.as_ref(), call, async {
      Ok(self.store.count_cases(&filter).await.map_err(store_err)? > 0)
    })
    .await
  }

  pub async fn count_persons(&self) -> Result<u64> {
    let filter = PersonFilter::active();
    let call = ServiceCall::new("count_persons", "count");
    observed(self.observer.as_ref(), call, async {
      self.store.count_persons(&filter).await.map_err(store_err)
    })
    .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Validate and insert a new person.
  ///
  /// Workload, ratings and status are server-managed: whatever the input
  /// says, the person starts idle, unrated and active.
  pub async fn create_person(&self, input: SupportPersonInput) -> Result<SupportPerson> {
    let mut call = ServiceCall::new("create_person", "insert");
    call.entity_id = input.alias.clone();
    observed(self.observer.as_ref(), call, self.create_inner(input)).await
  }

  async fn create_inner(&self, input: SupportPersonInput) -> Result<SupportPerson> {
    let mut person = validate_person(&input, ValidationMode::Create)?;

    let taken = self
      .store
      .count_persons(&PersonFilter::by_alias(person.alias.as_str()))
      .await
      .map_err(store_err)?;
    if taken > 0 {
      return Err(
        ConflictFailure {
          code:    ConflictCode::AliasAlreadyExists,
          message: format!("Support person with alias '{}' already exists", person.alias),
          details: None,
        }
        .into(),
      );
    }

    self.check_email_free(&person.email, None).await?;

    person.current_workload = 0;
    person.average_resolution_time = None;
    person.customer_satisfaction_rating = None;
    person.status = PersonStatus::Active;

    self.store.insert_person(person.clone()).await.map_err(store_err)?;
    tracing::info!(alias = %person.alias, "support person created");
    Ok(person)
  }

  /// Replace the active person stored under `alias`. The alias in `input` is
  /// ignored; aliases never change.
  pub async fn update_person(&self, alias: &str, input: SupportPersonInput) -> Result<SupportPerson> {
    let call = ServiceCall::new("update_person", "update").entity(alias);
    observed(self.observer.as_ref(), call, self.update_inner(alias, input)).await
  }

  async fn update_inner(&self, alias: &str, mut input: SupportPersonInput) -> Result<SupportPerson> {
    input.alias = Some(alias.to_owned());
    let person = validate_person(&input, ValidationMode::Update)?;

    self.check_email_free(&person.email, Some(alias)).await?;

    let matched = self
      .store
      .replace_person(&PersonFilter::by_alias(alias), person.clone())
      .await
      .map_err(store_err)?;
    if matched == 0 {
      return Err(NotFoundFailure::person(alias).into());
    }
    tracing::info!(alias, "support person updated");
    Ok(person)
  }

  /// Soft-delete the active person stored under `alias`.
  ///
  /// Refused while any case still references the alias.
  pub async fn delete_person(&self, alias: &str) -> Result<()> {
    let call = ServiceCall::new("delete_person", "update status").entity(alias);
    observed(self.observer.as_ref(), call, self.delete_inner(alias)).await
  }

  async fn delete_inner(&self, alias: &str) -> Result<()> {
    let referencing = assigned_to(alias);
    let active_cases = self.store.count_cases(&referencing).await.map_err(store_err)?;
    if active_cases > 0 {
      let sample = CaseQuery {
        filter: referencing,
        page:   Page { offset: 0, limit: CONFLICT_SAMPLE_SIZE },
      };
      let case_ids = self
        .store
        .find_cases(&sample)
        .await
        .map_err(store_err)?
        .into_iter()
        .filter_map(|c| c.id)
        .collect();
      return Err(
        ConflictFailure {
          code:    ConflictCode::CannotDeleteActiveAssignments,
          message: format!(
            "Cannot delete support person '{alias}' - person has {active_cases} active case assignment(s)"
          ),
          details: Some(AssignmentConflict { active_cases, case_ids }),
        }
        .into(),
      );
    }

    let matched = self
      .store
      .set_person_status(&PersonFilter::by_alias(alias), PersonStatus::Deleted)
      .await
      .map_err(store_err)?;
    if matched == 0 {
      return Err(NotFoundFailure::person(alias).into());
    }
    tracing::info!(alias, "support person deleted");
    Ok(())
  }

  /// Fails unless no active person other than `except` uses `email`.
  async fn check_email_free(&self, email: &str, except: Option<&str>) -> Result<()> {
    let mut filter = PersonFilter::active().and(PersonPredicate::Email(email.to_owned()));
    if let Some(alias) = except {
      filter = filter.and(PersonPredicate::NotAlias(alias.to_owned()));
    }
    let clashes = self.store.count_persons(&filter).await.map_err(store_err)?;
    if clashes > 0 {
      return Err(
        ValidationFailure::fields(vec![
          FieldError::new("email", "Email address is already in use").with_value(email),
        ])
        .into(),
      );
    }
    Ok(())
  }
}

fn assigned_to(alias: &str) -> CaseFilter {
  CaseFilter::all().and(CasePredicate::AssignedTo(alias.to_owned()))
}
