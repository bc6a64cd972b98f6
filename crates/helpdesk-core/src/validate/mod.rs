//! Business-rule validation.
//!
//! Validators are synchronous and never touch the store. Anything they need
//! to know about other records is resolved by the caller first and handed in
//! (see [`assignment::PersonLookup`]).

pub mod assignment;
pub mod person;

pub use assignment::{AssignmentPolicy, AssignmentValidator, PersonLookup, ResolvedAssignee};
pub use person::{ValidationMode, validate_person};
