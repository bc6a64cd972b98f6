//! Support cases: the tickets that support staff are assigned to.

use serde::{Deserialize, Serialize};

/// A support case.
///
/// `assigned_support_person` is a weak reference to
/// [`SupportPerson::alias`](crate::person::SupportPerson::alias). The store
/// does not enforce it; the case service checks it on every write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportCase {
  /// Opaque id; assigned by the store on insert when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:                                  Option<String>,
  pub title:                               Option<String>,
  pub description:                         Option<String>,
  pub owner:                               Option<String>,
  #[serde(default)]
  pub is_complete:                         bool,
  pub assigned_support_person:             Option<String>,
  pub support_person_assignment_reasoning: Option<String>,
}

impl SupportCase {
  /// The assignee alias. An empty string counts as unassigned.
  pub fn assignee(&self) -> Option<&str> {
    self.assigned_support_person.as_deref().filter(|a| !a.is_empty())
  }

  pub fn is_assigned(&self) -> bool { self.assignee().is_some() }
}
