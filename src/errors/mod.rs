//! Error handling for the Baloot engine.

pub mod domain;

pub use domain::{DomainError, StateKind, ValidationKind};
