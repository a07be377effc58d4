//! Domain-level error type used across the engine.
//!
//! This error type is transport- and storage-agnostic. Hosts translate
//! `DomainError` values directly into client messages; only `Invariant`
//! is fatal to the round.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation failure kinds: illegal actions rejected with a reason.
/// Always recoverable; the round continues.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    OutOfTurn,
    InvalidBid,
    IllegalAshkal,
    InvalidDeclaration,
    DuplicateDeclaration,
    ParseCard,
    InvalidCardRef,
    Other(String),
}

/// Wrong-step kinds: the operation was attempted from a step where it is
/// not defined. Rejected without any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateKind {
    PhaseMismatch,
    AlreadyActive,
    NotActive,
    GameLocked,
    TerminalPhase,
}

/// Central domain error type.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Illegal bid/play/declaration request; rejected, round continues.
    Validation(ValidationKind, String),
    /// Operation attempted from the wrong bidding/qayd step; no mutation.
    State(StateKind, String),
    /// Closed-form invariant failed: internal bug, fatal to the round.
    Invariant(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn state(kind: StateKind, detail: impl Into<String>) -> Self {
        Self::State(kind, detail.into())
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    /// Whether this error must halt the round rather than be returned to
    /// the acting player.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::State(kind, d) => write!(f, "state {kind:?}: {d}"),
            DomainError::Invariant(d) => write!(f, "invariant violated: {d}"),
        }
    }
}

impl Error for DomainError {}
