//! Error types for `helpdesk-core`.
//!
//! Every failure a service can return is structured: callers branch on the
//! machine-readable `code` (and `field` for validation errors), never on the
//! rendered message.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ─── Codes ───────────────────────────────────────────────────────────────────

/// Machine-readable code attached to a [`ValidationFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
  /// One or more field-level rules on a support person were violated.
  ValidationError,
  /// The assignee does not exist or is not active.
  InvalidSupportPerson,
  /// The target case does not accept assignments under the active policy.
  CaseNotAssignable,
  ReasoningTooLong,
  InappropriateReasoningContent,
}

impl ValidationCode {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::ValidationError => "VALIDATION_ERROR",
      Self::InvalidSupportPerson => "INVALID_SUPPORT_PERSON",
      Self::CaseNotAssignable => "CASE_NOT_ASSIGNABLE",
      Self::ReasoningTooLong => "REASONING_TOO_LONG",
      Self::InappropriateReasoningContent => "INAPPROPRIATE_REASONING_CONTENT",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictCode {
  AliasAlreadyExists,
  CannotDeleteActiveAssignments,
}

impl ConflictCode {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::AliasAlreadyExists => "ALIAS_ALREADY_EXISTS",
      Self::CannotDeleteActiveAssignments => "CANNOT_DELETE_ACTIVE_ASSIGNMENTS",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotFoundCode {
  CaseNotFound,
  SupportPersonNotFound,
}

impl NotFoundCode {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::CaseNotFound => "CASE_NOT_FOUND",
      Self::SupportPersonNotFound => "SUPPORT_PERSON_NOT_FOUND",
    }
  }
}

macro_rules! display_as_str {
  ($($ty:ty),*) => {
    $(impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    })*
  };
}

display_as_str!(ValidationCode, ConflictCode, NotFoundCode);

// ─── Failures ────────────────────────────────────────────────────────────────

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
  pub field:          String,
  pub message:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub provided_value: Option<String>,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into(), provided_value: None }
  }

  pub fn with_value(mut self, value: impl Into<String>) -> Self {
    self.provided_value = Some(value.into());
    self
  }
}

/// Input was rejected by a validator. Carries every violation found, not just
/// the first.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct ValidationFailure {
  pub code:    ValidationCode,
  pub message: String,
  pub errors:  Vec<FieldError>,
}

impl ValidationFailure {
  pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
    Self { code, message: message.into(), errors: Vec::new() }
  }

  pub fn with_error(mut self, error: FieldError) -> Self {
    self.errors.push(error);
    self
  }

  /// A `VALIDATION_ERROR` listing field-level violations.
  pub fn fields(errors: Vec<FieldError>) -> Self {
    Self { code: ValidationCode::ValidationError, message: "Invalid input data".into(), errors }
  }

  /// Whether any listed violation concerns `field`.
  pub fn has_field(&self, field: &str) -> bool {
    self.errors.iter().any(|e| e.field == field)
  }
}

/// Detail attached to `CANNOT_DELETE_ACTIVE_ASSIGNMENTS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentConflict {
  /// Number of cases still referencing the person.
  pub active_cases: u64,
  /// Up to three of those case ids.
  pub case_ids:     Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct ConflictFailure {
  pub code:    ConflictCode,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<AssignmentConflict>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct NotFoundFailure {
  pub code:    NotFoundCode,
  pub message: String,
}

impl NotFoundFailure {
  pub fn case(id: &str) -> Self {
    Self {
      code:    NotFoundCode::CaseNotFound,
      message: format!("Support case with ID '{id}' was not found"),
    }
  }

  pub fn person(alias: &str) -> Self {
    Self {
      code:    NotFoundCode::SupportPersonNotFound,
      message: format!("Support person with alias '{alias}' was not found"),
    }
  }
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationFailure),

  #[error("conflict: {0}")]
  Conflict(#[from] ConflictFailure),

  #[error("not found: {0}")]
  NotFound(#[from] NotFoundFailure),

  /// The store adapter itself failed; the underlying error is passed through.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// The machine-readable code, if this is not a store failure.
  pub fn code(&self) -> Option<&'static str> {
    match self {
      Self::Validation(v) => Some(v.code.as_str()),
      Self::Conflict(c) => Some(c.code.as_str()),
      Self::NotFound(n) => Some(n.code.as_str()),
      Self::Store(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn codes_serialise_as_their_string_form() {
    let validation = [
      ValidationCode::ValidationError,
      ValidationCode::InvalidSupportPerson,
      ValidationCode::CaseNotAssignable,
      ValidationCode::ReasoningTooLong,
      ValidationCode::InappropriateReasoningContent,
    ];
    for code in validation {
      assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
    }
    for code in [ConflictCode::AliasAlreadyExists, ConflictCode::CannotDeleteActiveAssignments] {
      assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
    }
    for code in [NotFoundCode::CaseNotFound, NotFoundCode::SupportPersonNotFound] {
      assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
    }
  }
}
