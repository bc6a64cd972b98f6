//! Case and person services: validation, store access and referential
//! integrity between the two collections.
//!
//! Every check that can reject a request runs before the first mutating store
//! call, so a validation, conflict or not-found failure leaves the store
//! untouched. Store failures part-way through a multi-step operation are
//! surfaced as [`Error::Store`] without any rollback.

mod case;
mod person;

use std::future::Future;

pub use case::CaseService;
pub use person::PersonService;

use crate::{
  Error, Result,
  observe::{ServiceCall, ServiceObserver},
};

/// Run `work`, reporting it to `observer` before and after.
async fn observed<T>(
  observer: &dyn ServiceObserver,
  call: ServiceCall,
  work: impl Future<Output = Result<T>>,
) -> Result<T> {
  observer.call_started(&call);
  let result = work.await;
  observer.call_finished(&call, (&result).into());
  result
}

fn store_err<E>(err: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::store(err)
}
