//! The two rank orderings and two point tables of Baloot.
//!
//! SUN uses one total order for every suit. HOKUM promotes the trump suit
//! to its own order (J and 9 on top) and its own point table; non-trump
//! suits keep the SUN order and SUN points.

use super::cards_types::{Card, Rank, Suit};
use super::contract::GameMode;

/// Rank order for SUN and for non-trump suits in HOKUM, weakest first.
pub const SUN_ORDER: [Rank; 8] = [
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ten,
    Rank::Ace,
];

/// Rank order for the trump suit in HOKUM, weakest first.
pub const HOKUM_TRUMP_ORDER: [Rank; 8] = [
    Rank::Seven,
    Rank::Eight,
    Rank::Queen,
    Rank::King,
    Rank::Ten,
    Rank::Ace,
    Rank::Nine,
    Rank::Jack,
];

/// Position of `rank` in the SUN order (0 = weakest).
pub fn sun_index(rank: Rank) -> u8 {
    match rank {
        Rank::Seven => 0,
        Rank::Eight => 1,
        Rank::Nine => 2,
        Rank::Jack => 3,
        Rank::Queen => 4,
        Rank::King => 5,
        Rank::Ten => 6,
        Rank::Ace => 7,
    }
}

/// Position of `rank` in the HOKUM trump order (0 = weakest).
pub fn hokum_trump_index(rank: Rank) -> u8 {
    match rank {
        Rank::Seven => 0,
        Rank::Eight => 1,
        Rank::Queen => 2,
        Rank::King => 3,
        Rank::Ten => 4,
        Rank::Ace => 5,
        Rank::Nine => 6,
        Rank::Jack => 7,
    }
}

/// SUN point table, also used for non-trump suits in HOKUM.
pub fn sun_points(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Jack => 2,
        _ => 0,
    }
}

/// HOKUM point table for the trump suit.
pub fn hokum_trump_points(rank: Rank) -> u8 {
    match rank {
        Rank::Jack => 20,
        Rank::Nine => 14,
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        _ => 0,
    }
}

/// Raw point value of `card` under the given contract mode and trump.
pub fn points(card: Card, mode: GameMode, trump: Option<Suit>) -> u8 {
    if mode == GameMode::Hokum && trump == Some(card.suit) {
        hokum_trump_points(card.rank)
    } else {
        sun_points(card.rank)
    }
}

/// Trick strength of `card` against the lead suit.
///
/// Trump cards in HOKUM score 100 plus their trump-order index, which
/// guarantees any trump beats any non-trump. Lead-suit cards score their
/// SUN-order index. Off-suit, non-trump cards can never win (-1).
pub fn strength(card: Card, lead: Suit, mode: GameMode, trump: Option<Suit>) -> i16 {
    if mode == GameMode::Hokum && trump == Some(card.suit) {
        return 100 + hokum_trump_index(card.rank) as i16;
    }
    if card.suit == lead {
        return sun_index(card.rank) as i16;
    }
    -1
}
