//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as
//! `{"success": false, "error": {"code", "message", "field"?, "providedValue"?, "details"?}}`.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use helpdesk_core::{Error, error::ValidationFailure};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] Error),

  #[error("malformed request body: {0}")]
  Body(#[from] JsonRejection),

  #[error("malformed query string: {0}")]
  Query(#[from] QueryRejection),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
  code:           &'static str,
  message:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  field:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  provided_value: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  details:        Option<Value>,
}

impl ErrorBody {
  fn new(code: &'static str, message: impl Into<String>) -> Self {
    Self { code, message: message.into(), field: None, provided_value: None, details: None }
  }

  fn validation(failure: ValidationFailure) -> Self {
    let mut body = Self::new(failure.code.as_str(), failure.message);
    // A single violation is promoted to the top level; several go in details.
    match failure.errors.as_slice() {
      [] => {}
      [only] => {
        body.field = Some(only.field.clone());
        body.provided_value = only.provided_value.clone();
      }
      many => body.details = serde_json::to_value(many).ok(),
    }
    body
  }
}

impl ApiError {
  fn parts(self) -> (StatusCode, ErrorBody) {
    match self {
      ApiError::Service(Error::Validation(v)) => (StatusCode::BAD_REQUEST, ErrorBody::validation(v)),
      ApiError::Service(Error::Conflict(c)) => {
        let mut body = ErrorBody::new(c.code.as_str(), c.message);
        body.details = c.details.and_then(|d| serde_json::to_value(d).ok());
        (StatusCode::CONFLICT, body)
      }
      ApiError::Service(Error::NotFound(n)) => {
        (StatusCode::NOT_FOUND, ErrorBody::new(n.code.as_str(), n.message))
      }
      ApiError::Service(Error::Store(_)) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::new("INTERNAL_ERROR", "An internal error occurred"),
      ),
      ApiError::Body(r) => (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION_ERROR", r.body_text())),
      ApiError::Query(r) => (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION_ERROR", r.body_text())),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error) = self.parts();
    (status, Json(serde_json::json!({ "success": false, "error": error }))).into_response()
  }
}

/// Converts service results, logging store failures with their context.
pub(crate) trait Logged<T> {
  fn logged(self, operation: &'static str, entity: Option<&str>) -> Result<T, ApiError>;
}

impl<T> Logged<T> for helpdesk_core::Result<T> {
  fn logged(self, operation: &'static str, entity: Option<&str>) -> Result<T, ApiError> {
    self.map_err(|err| {
      if let Error::Store(source) = &err {
        tracing::warn!(operation, entity, error = %source, "store call failed");
      }
      ApiError::Service(err)
    })
  }
}
