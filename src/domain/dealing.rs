//! Deterministic dealing of the 32-card deck: 8 cards to each seat.

use super::cards_types::{full_deck, Card};
use super::state::SEATS;

/// Simple deterministic RNG for shuffling.
///
/// SplitMix64-style generator: good statistical properties while remaining
/// fast and deterministic given a seed.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z ^= z >> 30;
        z = z.wrapping_mul(0xBF58476D1CE4E5B9);
        z ^= z >> 27;
        z = z.wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_range(&mut self, max: usize) -> usize {
        let m = max as u64;
        // Rejection sampling to avoid modulo bias.
        let limit = u64::MAX - (u64::MAX % m);
        loop {
            let x = self.next();
            if x < limit {
                return (x % m) as usize;
            }
        }
    }
}

/// Fisher-Yates shuffle using the deterministic RNG.
fn shuffle_with_seed(deck: &mut [Card], seed: u64) {
    let mut rng = SplitMix64::new(seed);
    for i in (1..deck.len()).rev() {
        let j = rng.next_range(i + 1);
        deck.swap(i, j);
    }
}

/// Deal the full deck into four sorted hands of 8, deterministically for a
/// given seed. Every card lands in exactly one hand.
pub fn deal_hands(seed: u64) -> [Vec<Card>; 4] {
    let mut deck = full_deck();
    shuffle_with_seed(&mut deck, seed);

    let mut hands: [Vec<Card>; 4] = Default::default();
    for (seat, hand_slot) in hands.iter_mut().enumerate().take(SEATS) {
        let start = seat * 8;
        let mut hand = deck[start..start + 8].to_vec();
        hand.sort();
        *hand_slot = hand;
    }
    hands
}

/// Derive the dealing seed for a round from the game's base seed.
///
/// Same game + round always deals the same hands; a redeal after an
/// all-pass bumps `deal_no` instead of the round number.
pub fn derive_dealing_seed(game_seed: i64, round_no: u16, deal_no: u16) -> u64 {
    let base = game_seed as u64;
    base.wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add((deal_no as u64).wrapping_mul(1_000))
        .wrapping_add(2)
}
