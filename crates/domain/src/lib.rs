//! Domain layer for wikireport
//!
//! Contains the values that flow through a single report run: lookup
//! results, report documents, recipient sets and delivery outcomes.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
