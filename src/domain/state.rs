//! Seat and team math for the four fixed seats.
//!
//! These live in `domain` so every layer shares a single source of truth
//! for rotation, partnerships, and play order.

pub type Seat = u8; // 0..=3
pub type Team = u8; // 0..=1

pub const SEATS: usize = 4;
pub const TEAMS: usize = 2;

/// Clockwise direction is positive (+1).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(4)) as Seat
}

/// Returns the next seat clockwise (0 → 1 → 2 → 3 → 0).
#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    seat_offset(seat, 1)
}

/// Returns the seat across the table (the partner).
#[inline]
pub fn partner(seat: Seat) -> Seat {
    seat_offset(seat, 2)
}

/// Seats 0/2 form team 0, seats 1/3 form team 1.
#[inline]
pub fn team_of(seat: Seat) -> Team {
    seat % 2
}

#[inline]
pub fn other_team(team: Team) -> Team {
    1 - team
}

/// Seat that acts first each round: left of the dealer.
#[inline]
pub fn left_of_dealer(dealer: Seat) -> Seat {
    next_seat(dealer)
}

/// Returns the seat `n` steps clockwise from `start`.
#[inline]
pub fn nth_from(start: Seat, n: u8) -> Seat {
    seat_offset(start, n as i8)
}

/// Play-order offset of `seat` from the seat left of the dealer (0..=3).
/// Smaller means earlier in the round's play order.
#[inline]
pub fn play_order_offset(seat: Seat, dealer: Seat) -> u8 {
    (seat as i16 - left_of_dealer(dealer) as i16).rem_euclid(4) as u8
}
