//! Round-resolution and scoring engine for four-player Baloot.
//!
//! The engine is a set of pure, synchronous transition functions over
//! explicit value types: bidding state machine, trick resolution,
//! declaration (project) detection, the game-point scoring pipeline, and
//! the qayd accusation state machine. Transport, persistence, timers, and
//! AI heuristics are external collaborators; the host serializes access
//! per room and translates `DomainError` values into client messages.

pub mod domain;
pub mod errors;
