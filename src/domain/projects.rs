//! Declaration (project) detection, validation, and arbitration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards_types::{Card, Rank, Suit, ALL_SUITS};
use super::contract::GameMode;
use super::rank_order::{sun_index, SUN_ORDER};
use super::state::{play_order_offset, team_of, Seat, Team};
use crate::errors::domain::{DomainError, ValidationKind};

/// Canonical declaration types. Each maps to exactly one canonical score.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DeclarationType {
    /// Run of 3.
    Sira,
    /// Run of 4.
    Fifty,
    /// Run of 5 or more, or four-of-a-kind in K/Q/J/10.
    Hundred,
    /// Four aces, SUN only.
    FourHundred,
    /// King + Queen of trump, HOKUM only.
    Baloot,
}

impl DeclarationType {
    /// The declared-value scale. Any alternate ranking weights used by bot
    /// heuristics stay strictly outside this engine.
    pub fn canonical_score(self) -> u16 {
        match self {
            DeclarationType::Sira => 20,
            DeclarationType::Fifty => 50,
            DeclarationType::Hundred => 100,
            DeclarationType::FourHundred => 400,
            DeclarationType::Baloot => 20,
        }
    }
}

/// A detected or credited declaration. `suit` is the run suit (or trump
/// for baloot); None for four-of-a-kind declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub decl_type: DeclarationType,
    pub suit: Option<Suit>,
    pub top_rank: Rank,
    pub seat: Seat,
    pub proof: Vec<Card>,
}

impl Declaration {
    pub fn team(&self) -> Team {
        team_of(self.seat)
    }

    pub fn score(&self) -> u16 {
        self.decl_type.canonical_score()
    }
}

/// Detect every declaration the hand holds under the given mode.
///
/// Runs are contiguous stretches in SUN order, per suit, and each maximal
/// run yields exactly one declaration: a 7-card run is ONE Hundred, never
/// a Sira plus a Fifty.
pub fn scan(hand: &[Card], seat: Seat, mode: GameMode, trump: Option<Suit>) -> Vec<Declaration> {
    let mut found = Vec::new();

    // Four-of-a-kind first.
    for rank in [Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten] {
        let cards: Vec<Card> = hand.iter().copied().filter(|c| c.rank == rank).collect();
        if cards.len() != 4 {
            continue;
        }
        let decl_type = if rank == Rank::Ace {
            // Four aces only reach 400 under SUN scoring.
            if mode.uses_sun_scoring() {
                DeclarationType::FourHundred
            } else {
                DeclarationType::Hundred
            }
        } else {
            DeclarationType::Hundred
        };
        found.push(Declaration {
            decl_type,
            suit: None,
            top_rank: rank,
            seat,
            proof: cards,
        });
    }

    // Maximal runs per suit, walked in SUN order.
    for suit in ALL_SUITS {
        let mut held = [false; 8];
        for c in hand.iter().filter(|c| c.suit == suit) {
            held[sun_index(c.rank) as usize] = true;
        }
        let mut i = 0usize;
        while i < 8 {
            if !held[i] {
                i += 1;
                continue;
            }
            let start = i;
            while i < 8 && held[i] {
                i += 1;
            }
            let len = i - start;
            let decl_type = match len {
                0..=2 => continue,
                3 => DeclarationType::Sira,
                4 => DeclarationType::Fifty,
                _ => DeclarationType::Hundred,
            };
            let proof: Vec<Card> = SUN_ORDER[start..i]
                .iter()
                .map(|&rank| Card { suit, rank })
                .collect();
            found.push(Declaration {
                decl_type,
                suit: Some(suit),
                top_rank: SUN_ORDER[i - 1],
                seat,
                proof,
            });
        }
    }

    // Baloot is independent of everything above.
    if mode == GameMode::Hokum {
        if let Some(trump) = trump {
            let king = Card {
                suit: trump,
                rank: Rank::King,
            };
            let queen = Card {
                suit: trump,
                rank: Rank::Queen,
            };
            if hand.contains(&king) && hand.contains(&queen) {
                found.push(Declaration {
                    decl_type: DeclarationType::Baloot,
                    suit: Some(trump),
                    top_rank: Rank::King,
                    seat,
                    proof: vec![king, queen],
                });
            }
        }
    }

    found
}

/// Confirm a requested declaration type is actually held, returning its
/// detected form. Prevents claiming an unheld combination.
pub fn validate(
    hand: &[Card],
    seat: Seat,
    mode: GameMode,
    trump: Option<Suit>,
    requested: DeclarationType,
) -> Result<Declaration, DomainError> {
    scan(hand, seat, mode, trump)
        .into_iter()
        .find(|d| d.decl_type == requested)
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidDeclaration,
                format!("hand does not hold a {requested:?}"),
            )
        })
}

/// Arbitrate two competing declarations: higher canonical score wins, then
/// higher top rank by SUN order, then the seat earlier in play order
/// (closer to the seat left of the dealer).
///
/// Baloot never competes; callers arbitrate only non-baloot declarations.
pub fn compare<'a>(a: &'a Declaration, b: &'a Declaration, dealer: Seat) -> &'a Declaration {
    debug_assert!(a.decl_type != DeclarationType::Baloot);
    debug_assert!(b.decl_type != DeclarationType::Baloot);

    if a.score() != b.score() {
        return if a.score() > b.score() { a } else { b };
    }
    let (ra, rb) = (sun_index(a.top_rank), sun_index(b.top_rank));
    if ra != rb {
        return if ra > rb { a } else { b };
    }
    let (oa, ob) = (
        play_order_offset(a.seat, dealer),
        play_order_offset(b.seat, dealer),
    );
    if oa <= ob {
        a
    } else {
        b
    }
}

/// Per-round record of credited declarations. A team may not re-credit an
/// identical (type, suit, top rank) declaration twice within a round.
#[derive(Debug, Default)]
pub struct DeclarationBook {
    accepted: HashSet<(Team, DeclarationType, Option<Suit>, Rank)>,
}

impl DeclarationBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a declaration, rejecting exact repeats with no side effects.
    pub fn accept(&mut self, decl: &Declaration) -> Result<(), DomainError> {
        let key = (decl.team(), decl.decl_type, decl.suit, decl.top_rank);
        if !self.accepted.insert(key) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateDeclaration,
                format!("{:?} already credited this round", decl.decl_type),
            ));
        }
        debug!(?decl.decl_type, seat = decl.seat, "declaration credited");
        Ok(())
    }

    pub fn reset_round(&mut self) {
        self.accepted.clear();
    }
}
