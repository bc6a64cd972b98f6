//! Handlers for `/supportpersons` endpoints.
//!
//! | Method   | Path                      | Notes |
//! |----------|---------------------------|-------|
//! | `GET`    | `/supportpersons`         | `?specialization=&seniority=&available=&limit=&offset=&sortBy=&sortOrder=` |
//! | `POST`   | `/supportpersons`         | 201; 409 on duplicate alias |
//! | `GET`    | `/supportpersons/{alias}` | Active persons only |
//! | `PUT`    | `/supportpersons/{alias}` | Alias in the body is ignored |
//! | `DELETE` | `/supportpersons/{alias}` | 204; 409 while cases reference the person |

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
  error::NotFoundFailure,
  person::{SupportPerson, SupportPersonInput},
  query::{PersonListFilter, PersonPage},
  store::SupportStore,
};
use serde::Deserialize;

use crate::{
  ApiState, Envelope, Scope,
  error::{ApiError, Logged as _},
  ok,
};

#[derive(Debug, Deserialize)]
pub struct PersonAlias {
  pub alias: String,
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub specialization: Option<String>,
  pub seniority:      Option<String>,
  pub available:      Option<bool>,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
  pub sort_by:        Option<String>,
  pub sort_order:     Option<String>,
}

impl From<ListParams> for PersonListFilter {
  fn from(p: ListParams) -> Self {
    Self {
      specialization: p.specialization,
      seniority:      p.seniority,
      available:      p.available,
      limit:          p.limit,
      offset:         p.offset,
      sort_by:        p.sort_by,
      sort_order:     p.sort_order,
    }
  }
}

/// `GET /supportpersons`
pub async fn list<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(scope): Path<Scope>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Envelope<PersonPage>>, ApiError> {
  let Query(params) = params?;
  let page = state
    .persons
    .list_persons(&params.into())
    .await
    .logged("list_persons", None)?;
  tracing::debug!(%scope, total = page.pagination.total, "listed support persons");
  Ok(ok(page))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /supportpersons`
pub async fn create<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(scope): Path<Scope>,
  body: Result<Json<SupportPersonInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let alias = input.alias.clone();
  let person = state
    .persons
    .create_person(input)
    .await
    .logged("create_person", alias.as_deref())?;
  tracing::debug!(%scope, alias = %person.alias, "created support person");
  Ok((StatusCode::CREATED, ok(person)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /supportpersons/{alias}`
pub async fn get_one<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(PersonAlias { alias }): Path<PersonAlias>,
) -> Result<Json<Envelope<SupportPerson>>, ApiError> {
  let person = state
    .persons
    .get_person(&alias)
    .await
    .logged("get_person", Some(&alias))?
    .ok_or_else(|| Error::from(NotFoundFailure::person(&alias)))?;
  Ok(ok(person))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /supportpersons/{alias}`
pub async fn update<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(PersonAlias { alias }): Path<PersonAlias>,
  body: Result<Json<SupportPersonInput>, JsonRejection>,
) -> Result<Json<Envelope<SupportPerson>>, ApiError> {
  let Json(input) = body?;
  let person = state
    .persons
    .update_person(&alias, input)
    .await
    .logged("update_person", Some(&alias))?;
  Ok(ok(person))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /supportpersons/{alias}`
pub async fn delete<S: SupportStore>(
  State(state): State<ApiState<S>>,
  Path(PersonAlias { alias }): Path<PersonAlias>,
) -> Result<StatusCode, ApiError> {
  state.persons.delete_person(&alias).await.logged("delete_person", Some(&alias))?;
  Ok(StatusCode::NO_CONTENT)
}
