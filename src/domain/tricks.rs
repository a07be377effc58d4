//! Trick model and trick-winner resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards_types::{Card, Suit};
use super::contract::Contract;
use super::rank_order::{points, strength};
use super::state::{Seat, SEATS};
use crate::errors::domain::DomainError;

/// Upstream legality judgment attached to a play. The engine never decides
/// legality itself; it only reads these fields during qayd adjudication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayMetadata {
    pub is_illegal: bool,
    pub illegal_reason: Option<ViolationType>,
    /// A card still in the offender's hand proving the play was illegal
    /// (e.g. the lead-suit card they failed to follow with).
    pub proof_hint: Option<Card>,
}

impl PlayMetadata {
    pub fn legal() -> Self {
        Self::default()
    }
}

/// Rule-violation categories the upstream legality checker can flag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Held the lead suit but discarded another.
    RevokeSuit,
    /// HOKUM: could have trumped but discarded instead.
    FailedToTrump,
    /// HOKUM: played a lower trump while holding a higher one when obliged
    /// to overtrump.
    UnderTrump,
    /// Played outside the seat's turn.
    OutOfTurn,
}

/// A single play in a trick: who, what, and the upstream legality verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub seat: Seat,
    pub card: Card,
    #[serde(default)]
    pub meta: PlayMetadata,
}

impl TrickPlay {
    pub fn legal(seat: Seat, card: Card) -> Self {
        Self {
            seat,
            card,
            meta: PlayMetadata::legal(),
        }
    }
}

/// An ordered sequence of plays. Complete at exactly four; the winner is
/// always computed from the plays, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickRecord {
    pub plays: Vec<TrickPlay>,
}

impl TrickRecord {
    pub fn new(plays: Vec<TrickPlay>) -> Self {
        Self { plays }
    }

    /// Suit of the first play, if any play has been made.
    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|p| p.card.suit)
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == SEATS
    }
}

/// Result of resolving one completed trick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrickOutcome {
    pub winner: Seat,
    /// Raw card points captured, excluding the last-trick bonus.
    pub points: u16,
}

/// Resolve a completed trick to its winning seat and point total.
///
/// All 32 cards are distinct, so two plays never tie on strength and no
/// tie-break is needed. Anything other than exactly four plays is an
/// internal bug, not a user error.
pub fn resolve_trick(trick: &TrickRecord, contract: &Contract) -> Result<TrickOutcome, DomainError> {
    if trick.plays.len() != SEATS {
        return Err(DomainError::invariant(format!(
            "trick resolved with {} plays, expected {SEATS}",
            trick.plays.len()
        )));
    }
    let lead = trick.plays[0].card.suit;

    let mut best_idx = 0usize;
    let mut best_strength = strength(trick.plays[0].card, lead, contract.mode, contract.trump);
    for (i, play) in trick.plays.iter().enumerate().skip(1) {
        let s = strength(play.card, lead, contract.mode, contract.trump);
        if s > best_strength {
            best_idx = i;
            best_strength = s;
        }
    }

    let total: u16 = trick
        .plays
        .iter()
        .map(|p| points(p.card, contract.mode, contract.trump) as u16)
        .sum();

    let winner = trick.plays[best_idx].seat;
    debug!(winner, points = total, "trick resolved");
    Ok(TrickOutcome {
        winner,
        points: total,
    })
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Follow-suit helper for hosts: the cards a hand may legally play against
/// an optional lead suit. Turn enforcement is the host's concern.
pub fn legal_moves(hand: &[Card], lead: Option<Suit>) -> Vec<Card> {
    if let Some(lead) = lead {
        if hand_has_suit(hand, lead) {
            let mut v: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead).collect();
            v.sort();
            return v;
        }
    }
    let mut any = hand.to_vec();
    any.sort();
    any
}

/// Trick history of one round as the qayd engine sees it: completed tricks
/// in play order plus the unresolved trick in progress, if any.
#[derive(Debug, Clone, Default)]
pub struct RoundHistory {
    pub completed: Vec<TrickRecord>,
    pub current: Option<TrickRecord>,
}

impl RoundHistory {
    /// Absolute index of the in-progress trick.
    pub fn current_trick_idx(&self) -> usize {
        self.completed.len()
    }

    /// Look up a play by (trick index, card index). The in-progress trick
    /// sits one past the completed ones.
    pub fn play_at(&self, trick_idx: usize, card_idx: usize) -> Option<&TrickPlay> {
        let trick = if trick_idx < self.completed.len() {
            &self.completed[trick_idx]
        } else if trick_idx == self.completed.len() {
            self.current.as_ref()?
        } else {
            return None;
        };
        trick.plays.get(card_idx)
    }
}
