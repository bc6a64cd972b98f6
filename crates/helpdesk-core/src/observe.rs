//! Optional instrumentation around service calls.
//!
//! Services always hold an observer; "no telemetry" is [`NoopObserver`].
//! Observers are fire-and-forget and cannot influence the call they watch.

use crate::Error;

/// Describes one service call, in the vocabulary of database client spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
  /// Service operation, e.g. `create_case`.
  pub operation: &'static str,
  /// Short description of the store work, e.g. `insert`.
  pub statement: &'static str,
  pub entity_id: Option<String>,
}

impl ServiceCall {
  pub fn new(operation: &'static str, statement: &'static str) -> Self {
    Self { operation, statement, entity_id: None }
  }

  pub fn entity(mut self, id: impl Into<String>) -> Self {
    self.entity_id = Some(id.into());
    self
  }
}

#[derive(Debug, Clone, Copy)]
pub enum CallOutcome<'a> {
  Ok,
  Failed(&'a Error),
}

impl<'a, T> From<&'a Result<T, Error>> for CallOutcome<'a> {
  fn from(result: &'a Result<T, Error>) -> Self {
    match result {
      Ok(_) => Self::Ok,
      Err(e) => Self::Failed(e),
    }
  }
}

pub trait ServiceObserver: Send + Sync {
  fn call_started(&self, call: &ServiceCall) { let _ = call; }

  fn call_finished(&self, call: &ServiceCall, outcome: CallOutcome<'_>) {
    let _ = (call, outcome);
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ServiceObserver for NoopObserver {}

/// Emits a `tracing` event per finished call, tagged with the store system
/// name.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
  system: &'static str,
}

impl TracingObserver {
  pub fn new(system: &'static str) -> Self { Self { system } }
}

impl ServiceObserver for TracingObserver {
  fn call_started(&self, call: &ServiceCall) {
    tracing::trace!(
      db.system = self.system,
      db.statement = call.statement,
      entity_id = call.entity_id.as_deref(),
      "{} started",
      call.operation,
    );
  }

  fn call_finished(&self, call: &ServiceCall, outcome: CallOutcome<'_>) {
    match outcome {
      CallOutcome::Ok => tracing::debug!(
        db.system = self.system,
        db.statement = call.statement,
        entity_id = call.entity_id.as_deref(),
        "{} ok",
        call.operation,
      ),
      CallOutcome::Failed(err) => tracing::debug!(
        db.system = self.system,
        db.statement = call.statement,
        entity_id = call.entity_id.as_deref(),
        code = err.code(),
        error = %err,
        "{} failed",
        call.operation,
      ),
    }
  }
}
