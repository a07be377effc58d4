//! Domain layer: pure game logic types and transition functions.

pub mod bidding;
pub mod cards_parsing;
pub mod cards_types;
pub mod contract;
pub mod dealing;
pub mod projects;
pub mod qayd;
pub mod rank_order;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod tests_bidding;
#[cfg(test)]
mod tests_projects;

// Re-exports for ergonomics
pub use cards_parsing::try_parse_cards;
pub use cards_types::{full_deck, Card, Rank, Suit};
pub use contract::{Contract, GameMode, HokumVariant};
pub use dealing::{deal_hands, derive_dealing_seed};
pub use projects::{Declaration, DeclarationType};
pub use qayd::{CardRef, MemoryLedger, QaydEngine, QaydLedger};
pub use scoring::{compute_game_points, tally_round, GamePointsResult, RoundTally};
pub use state::{Seat, Team};
pub use tricks::{resolve_trick, PlayMetadata, RoundHistory, TrickPlay, TrickRecord};
