//! Handlers for `/cases` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/cases`      | `?pageNumber=` (legacy) or `?assignedTo=&unassigned=&limit=&offset=` |
//! | `POST`   | `/cases`      | 202 with the stored case |
//! | `GET`    | `/cases/{id}` | 404 if not found |
//! | `PUT`    | `/cases/{id}` | Full replace |
//! | `DELETE` | `/cases/{id}` | 204; 404 if not found |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use helpdesk_core::{
  Error,
  case::SupportCase,
  error::NotFoundFailure,
  query::CaseListFilter,
  store::SupportStore,
};
use serde::Deserialize;

use crate::{
  ApiState, Envelope, Scope,
  error::{ApiError, Logged as _},
  ok,
};

#[derive(Debug, Deserialize)]
pub struct CaseId {
  pub id: String,
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub page_number: Option<i64>,
  pub assigned_to: Option<String>,
  pub unassigned:  Option<bool>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

impl ListParams {
  /// The filtered listing, if any filtering or paging parameter was given.
  /// Otherwise the request is a legacy paged one.
  pub fn filter(&self) -> Option<CaseListFilter> {
    let filtered = self.assigned_to.is_some()
      || self.unassigned.is_some()
      || self.limit.is_some()
      || self.offset.is_some();
    filtered.then(|| CaseListFilter {
      assigned_to: self.assigned_to.clone(),
      unassigned:  self.unassigned,
      limit:       self.limit,
      offset:      self.offset,
    })
  }
}

/// `GET /cases`
pub async fn list<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(scope): Path<Scope>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<SupportCase>>>, ApiError> {
  let Query(params) = params?;
  let cases = match params.filter() {
    Some(filter) => state.cases.list_cases_filtered(&filter).await,
    None => state.cases.list_cases_paged(params.page_number).await,
  }
  .logged("list_cases", None)?;
  tracing::debug!(%scope, count = cases.len(), "listed support cases");
  Ok(ok(cases))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /cases`
pub async fn create<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(scope): Path<Scope>,
  body: Result<Json<SupportCase>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(case) = body?;
  let stored = state.cases.create_case(case).await.logged("create_case", None)?;
  tracing::debug!(%scope, id = stored.id.as_deref(), "created support case");
  Ok((StatusCode::ACCEPTED, ok(stored)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /cases/{id}`
pub async fn get_one<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(CaseId { id }): Path<CaseId>,
) -> Result<Json<Envelope<SupportCase>>, ApiError> {
  let case = state
    .cases
    .get_case(&id)
    .await
    .logged("get_case", Some(&id))?
    .ok_or_else(|| Error::from(NotFoundFailure::case(&id)))?;
  Ok(ok(case))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /cases/{id}`
pub async fn update<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(CaseId { id }): Path<CaseId>,
  body: Result<Json<SupportCase>, JsonRejection>,
) -> Result<Json<Envelope<SupportCase>>, ApiError> {
  let Json(case) = body?;
  let updated = state.cases.update_case(&id, case).await.logged("update_case", Some(&id))?;
  Ok(ok(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /cases/{id}`
pub async fn delete<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(CaseId { id }): Path<CaseId>,
) -> Result<StatusCode, ApiError> {
  if state.cases.get_case(&id).await.logged("get_case", Some(&id))?.is_none() {
    return Err(Error::from(NotFoundFailure::case(&id)).into());
  }
  state.cases.delete_case(&id).await.logged("delete_case", Some(&id))?;
  Ok(StatusCode::NO_CONTENT)
}
