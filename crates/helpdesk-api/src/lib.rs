//! JSON REST API for the helpdesk.
//!
//! Exposes an axum [`Router`] over the case and person services for any
//! [`SupportStore`]. Resources are scoped under
//! `/{subscription_id}/{resource_group}/{resource_id}`; the scope is carried
//! for logging and routing only.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(helpdesk_api::api_router(ApiState::new(cases, persons)))
//! ```

pub mod cases;
pub mod error;
pub mod persons;

use std::{fmt, sync::Arc};

use axum::{Json, Router, routing::get};
use helpdesk_core::{
  service::{CaseService, PersonService},
  store::SupportStore,
};
use serde::{Deserialize, Serialize};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub cases:   Arc<CaseService<S>>,
  pub persons: Arc<PersonService<S>>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { cases: self.cases.clone(), persons: self.persons.clone() }
  }
}

impl<S: SupportStore> ApiState<S> {
  pub fn new(cases: CaseService<S>, persons: PersonService<S>) -> Self {
    Self { cases: Arc::new(cases), persons: Arc::new(persons) }
  }
}

// ─── Shared extractors and bodies ────────────────────────────────────────────

/// The resource scope every route is mounted under.
#[derive(Debug, Clone, Deserialize)]
pub struct Scope {
  pub subscription_id: String,
  pub resource_group:  String,
  pub resource_id:     String,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}/{}", self.subscription_id, self.resource_group, self.resource_id)
  }
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  pub data:    T,
}

pub(crate) fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
  Json(Envelope { success: true, data })
}

// ─── Router ──────────────────────────────────────────────────────────────────

const CASES: &str = "/{subscription_id}/{resource_group}/{resource_id}/cases";
const CASE: &str = "/{subscription_id}/{resource_group}/{resource_id}/cases/{id}";
const PERSONS: &str = "/{subscription_id}/{resource_group}/{resource_id}/supportpersons";
const PERSON: &str = "/{subscription_id}/{resource_group}/{resource_id}/supportpersons/{alias}";

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: SupportStore + 'static,
{
  Router::new()
    // Cases
    .route(CASES, get(cases::list::<S>).post(cases::create::<S>))
    .route(CASE, get(cases::get_one::<S>).put(cases::update::<S>).delete(cases::delete::<S>))
    // Support persons
    .route(PERSONS, get(persons::list::<S>).post(persons::create::<S>))
    .route(
      PERSON,
      get(persons::get_one::<S>).put(persons::update::<S>).delete(persons::delete::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
