//! Cross-entity rules for linking a case to a support person, and the privacy
//! screen on assignment reasoning.

use serde::Deserialize;

use crate::{
  case::SupportCase,
  error::{FieldError, ValidationCode, ValidationFailure},
  person::{PersonStatus, SupportPerson},
};

pub const MAX_REASONING_CHARS: usize = 2000;

/// Case-insensitive substrings that must not appear in reasoning text.
/// `@` catches email addresses.
pub const DISALLOWED_REASONING_PATTERNS: [&str; 4] =
  ["@", "customer name:", "phone:", "personal assessment"];

/// What the validator needs to know about a prospective assignee.
pub trait PersonLookup {
  fn exists(&self, alias: &str) -> bool;
  fn is_active(&self, alias: &str) -> bool;
}

/// An assignee lookup resolved ahead of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAssignee {
  Found { alias: String, status: PersonStatus },
  Missing,
  /// The lookup itself failed. Treated like [`Missing`](Self::Missing) so a
  /// store outage can never let an unchecked assignment through.
  Unavailable,
}

impl ResolvedAssignee {
  pub fn from_lookup<E>(result: Result<Option<SupportPerson>, E>) -> Self {
    match result {
      Ok(Some(p)) => Self::Found { alias: p.alias, status: p.status },
      Ok(None) => Self::Missing,
      Err(_) => Self::Unavailable,
    }
  }
}

impl PersonLookup for ResolvedAssignee {
  fn exists(&self, alias: &str) -> bool {
    matches!(self, Self::Found { alias: found, .. } if found == alias)
  }

  fn is_active(&self, alias: &str) -> bool {
    matches!(self, Self::Found { alias: found, status } if found == alias && status.is_active())
  }
}

/// Whether the state of the target case gates assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
  /// Any existing case may be assigned.
  #[default]
  Permissive,
  /// A case already marked complete may not be given a new assignee.
  RejectCompletedCases,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentValidator {
  policy: AssignmentPolicy,
}

impl AssignmentValidator {
  pub fn new(policy: AssignmentPolicy) -> Self { Self { policy } }

  pub fn policy(&self) -> AssignmentPolicy { self.policy }

  /// Check that `alias` may be assigned to the case currently stored as
  /// `existing` (`None` when the case is being created).
  ///
  /// An absent or empty alias always passes: unassigning is always allowed.
  pub fn validate_assignment(
    &self,
    existing: Option<&SupportCase>,
    alias: Option<&str>,
    lookup: &impl PersonLookup,
  ) -> Result<(), ValidationFailure> {
    let Some(alias) = alias.filter(|a| !a.is_empty()) else {
      return Ok(());
    };

    if !lookup.exists(alias) || !lookup.is_active(alias) {
      return Err(
        ValidationFailure::new(
          ValidationCode::InvalidSupportPerson,
          format!("Cannot assign support person '{alias}' - person not found or inactive"),
        )
        .with_error(
          FieldError::new("assignedSupportPerson", "Support person not found or inactive")
            .with_value(alias),
        ),
      );
    }

    if let Some(case) = existing
      && !self.accepts_assignment(case)
    {
      return Err(ValidationFailure::new(
        ValidationCode::CaseNotAssignable,
        format!(
          "Support case '{}' is complete and cannot be assigned",
          case.id.as_deref().unwrap_or_default()
        ),
      ));
    }

    Ok(())
  }

  fn accepts_assignment(&self, case: &SupportCase) -> bool {
    match self.policy {
      AssignmentPolicy::Permissive => true,
      AssignmentPolicy::RejectCompletedCases => !case.is_complete,
    }
  }

  /// Screen free-text reasoning for length and disallowed content. This is a
  /// coarse PII screen; false positives are accepted.
  pub fn validate_reasoning(&self, reasoning: Option<&str>) -> Result<(), ValidationFailure> {
    let Some(text) = reasoning.filter(|t| !t.is_empty()) else {
      return Ok(());
    };

    if text.chars().count() > MAX_REASONING_CHARS {
      return Err(
        ValidationFailure::new(
          ValidationCode::ReasoningTooLong,
          "Reasoning text cannot exceed 2000 characters",
        )
        .with_error(FieldError::new(
          "supportPersonAssignmentReasoning",
          "Reasoning text cannot exceed 2000 characters",
        )),
      );
    }

    let lowered = text.to_lowercase();
    if DISALLOWED_REASONING_PATTERNS.iter().any(|p| lowered.contains(p)) {
      return Err(
        ValidationFailure::new(
          ValidationCode::InappropriateReasoningContent,
          "Reasoning text contains inappropriate content",
        )
        .with_error(FieldError::new(
          "supportPersonAssignmentReasoning",
          "Reasoning text contains inappropriate content",
        )),
      );
    }

    Ok(())
  }
}
