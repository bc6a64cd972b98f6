//! Core types, validation rules and services for the helpdesk backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::SupportStore`]; transport layers call into the
//! services in [`service`] and map the typed [`Error`] onto their own wire
//! format.

pub mod case;
pub mod error;
pub mod memory;
pub mod observe;
pub mod person;
pub mod query;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
