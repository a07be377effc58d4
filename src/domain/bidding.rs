//! Bidding state machine: turns bid actions into a finalized Contract.
//!
//! The machine enforces ordering and legality only. Whether a gablak
//! override is actually backed by a strong enough hand is the host's
//! heuristic; by the time `apply` is called that judgment is done.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards_types::Suit;
use super::contract::{Contract, GameMode, HokumVariant, MAX_DOUBLING};
use super::state::{left_of_dealer, next_seat, other_team, partner, team_of, Seat, Team};
use crate::errors::domain::{DomainError, StateKind, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum BidPhase {
    RoundOne,
    GablakWindow,
    RoundTwo,
    Doubling,
    VariantSelection,
    Finished,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidAction {
    Pass,
    Sun,
    Hokum(Suit),
    Ashkal,
    Double,
    Gahwa,
    Variant(HokumVariant),
}

/// What a successful action did to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidOutcome {
    InProgress,
    /// Both rounds passed out: same dealer deals again.
    Redeal,
    Contracted(Contract),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct PendingBid {
    seat: Seat,
    mode: GameMode,
    trump: Option<Suit>,
}

#[derive(Debug, Clone)]
pub struct BiddingState {
    dealer: Seat,
    phase: BidPhase,
    /// Seat expected to act; None in Doubling (team-based) and Finished.
    turn: Option<Seat>,
    /// Actors left in the current seat-ordered phase.
    remaining: u8,
    pending: Option<PendingBid>,
    doubling_level: u8,
    doubling_turn: Option<Team>,
    doubled_by: Option<Team>,
    sun_doubled: bool,
    gahwa: bool,
    variant: Option<HokumVariant>,
    contract: Option<Contract>,
}

impl BiddingState {
    pub fn new(dealer: Seat) -> Self {
        Self {
            dealer,
            phase: BidPhase::RoundOne,
            turn: Some(left_of_dealer(dealer)),
            remaining: 4,
            pending: None,
            doubling_level: 1,
            doubling_turn: None,
            doubled_by: None,
            sun_doubled: false,
            gahwa: false,
            variant: None,
            contract: None,
        }
    }

    pub fn phase(&self) -> BidPhase {
        self.phase
    }

    pub fn turn(&self) -> Option<Seat> {
        self.turn
    }

    pub fn doubling_level(&self) -> u8 {
        self.doubling_level
    }

    /// The finalized contract, once phase is Finished with a bid.
    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    /// Apply one bid action for `seat`.
    pub fn apply(&mut self, seat: Seat, action: BidAction) -> Result<BidOutcome, DomainError> {
        match self.phase {
            BidPhase::RoundOne | BidPhase::RoundTwo => self.apply_bid_round(seat, action),
            BidPhase::GablakWindow => self.apply_gablak(seat, action),
            BidPhase::Doubling => self.apply_doubling(seat, action),
            BidPhase::VariantSelection => self.apply_variant(seat, action),
            BidPhase::Finished => Err(DomainError::state(
                StateKind::PhaseMismatch,
                "bidding already finished",
            )),
        }
    }

    fn require_turn(&self, seat: Seat) -> Result<(), DomainError> {
        if self.turn != Some(seat) {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("seat {seat} acted out of turn"),
            ));
        }
        Ok(())
    }

    fn effective_bidder(&self, pending: &PendingBid) -> Seat {
        // ASHKAL credits the dealer's partner as bidder.
        if pending.mode == GameMode::Ashkal {
            partner(self.dealer)
        } else {
            pending.seat
        }
    }

    fn apply_bid_round(&mut self, seat: Seat, action: BidAction) -> Result<BidOutcome, DomainError> {
        self.require_turn(seat)?;

        let pending = match action {
            BidAction::Pass => {
                self.remaining -= 1;
                if self.remaining > 0 {
                    self.turn = Some(next_seat(seat));
                    return Ok(BidOutcome::InProgress);
                }
                if self.phase == BidPhase::RoundOne {
                    self.phase = BidPhase::RoundTwo;
                    self.turn = Some(left_of_dealer(self.dealer));
                    self.remaining = 4;
                    debug!("round one passed out, opening round two");
                    return Ok(BidOutcome::InProgress);
                }
                self.phase = BidPhase::Finished;
                self.turn = None;
                debug!("both bid rounds passed out, redeal");
                return Ok(BidOutcome::Redeal);
            }
            BidAction::Sun => PendingBid {
                seat,
                mode: GameMode::Sun,
                trump: None,
            },
            BidAction::Hokum(trump) => PendingBid {
                seat,
                mode: GameMode::Hokum,
                trump: Some(trump),
            },
            BidAction::Ashkal => {
                if seat != self.dealer && seat != next_seat(self.dealer) {
                    return Err(DomainError::validation(
                        ValidationKind::IllegalAshkal,
                        "ashkal is restricted to the dealer and the seat to their left",
                    ));
                }
                PendingBid {
                    seat,
                    mode: GameMode::Ashkal,
                    trump: None,
                }
            }
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::InvalidBid,
                    "only pass, sun, hokum, or ashkal during bid rounds",
                ))
            }
        };

        debug!(seat, mode = ?pending.mode, "bid placed");
        self.pending = Some(pending);
        self.remaining -= 1;
        if self.phase == BidPhase::RoundOne && self.remaining > 0 {
            // Seats after the bidder get the gablak override window.
            self.phase = BidPhase::GablakWindow;
            self.turn = Some(next_seat(seat));
        } else {
            self.start_doubling();
        }
        Ok(BidOutcome::InProgress)
    }

    fn apply_gablak(&mut self, seat: Seat, action: BidAction) -> Result<BidOutcome, DomainError> {
        self.require_turn(seat)?;

        match action {
            BidAction::Pass => {}
            BidAction::Sun => {
                self.pending = Some(PendingBid {
                    seat,
                    mode: GameMode::Sun,
                    trump: None,
                });
                debug!(seat, "gablak override to sun");
            }
            BidAction::Hokum(trump) => {
                self.pending = Some(PendingBid {
                    seat,
                    mode: GameMode::Hokum,
                    trump: Some(trump),
                });
                debug!(seat, "gablak override to hokum");
            }
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::InvalidBid,
                    "gablak window allows pass, sun, or hokum only",
                ))
            }
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            self.turn = Some(next_seat(seat));
        } else {
            self.start_doubling();
        }
        Ok(BidOutcome::InProgress)
    }

    fn start_doubling(&mut self) {
        // Invariant: a pending bid exists whenever doubling starts.
        if let Some(pending) = self.pending {
            let bidder = self.effective_bidder(&pending);
            self.doubling_turn = Some(other_team(team_of(bidder)));
        }
        self.phase = BidPhase::Doubling;
        self.turn = None;
    }

    fn apply_doubling(&mut self, seat: Seat, action: BidAction) -> Result<BidOutcome, DomainError> {
        let pending = self.pending.ok_or_else(|| {
            DomainError::invariant("doubling phase entered without a pending bid")
        })?;
        let acting_team = team_of(seat);
        if Some(acting_team) != self.doubling_turn {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("team {acting_team} may not escalate now"),
            ));
        }

        match action {
            BidAction::Pass => self.finish_doubling(),
            BidAction::Double => {
                if pending.mode.uses_sun_scoring() {
                    // SUN carries a single-level flag, not a cascade.
                    self.sun_doubled = true;
                    self.doubled_by = Some(acting_team);
                    debug!(seat, "sun contract doubled");
                    self.finish_doubling()
                } else {
                    if self.doubling_level >= MAX_DOUBLING {
                        return Err(DomainError::validation(
                            ValidationKind::InvalidBid,
                            "doubling cascade is capped; only gahwa remains",
                        ));
                    }
                    self.doubling_level = if self.doubling_level == 1 {
                        2
                    } else {
                        self.doubling_level + 1
                    };
                    self.doubled_by = Some(acting_team);
                    self.doubling_turn = Some(other_team(acting_team));
                    debug!(seat, level = self.doubling_level, "hokum escalated");
                    Ok(BidOutcome::InProgress)
                }
            }
            BidAction::Gahwa => {
                if pending.mode != GameMode::Hokum || self.doubling_level < MAX_DOUBLING {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidBid,
                        "gahwa is the final escalation of a fully doubled hokum",
                    ));
                }
                self.gahwa = true;
                self.doubled_by = Some(acting_team);
                debug!(seat, "gahwa declared");
                self.finish_doubling()
            }
            _ => Err(DomainError::validation(
                ValidationKind::InvalidBid,
                "doubling phase allows pass, double, or gahwa only",
            )),
        }
    }

    fn finish_doubling(&mut self) -> Result<BidOutcome, DomainError> {
        let pending = self.pending.ok_or_else(|| {
            DomainError::invariant("doubling finished without a pending bid")
        })?;
        if pending.mode == GameMode::Hokum && self.doubling_level >= 2 && !self.gahwa {
            self.phase = BidPhase::VariantSelection;
            self.turn = Some(self.effective_bidder(&pending));
            return Ok(BidOutcome::InProgress);
        }
        self.finish(pending)
    }

    fn apply_variant(&mut self, seat: Seat, action: BidAction) -> Result<BidOutcome, DomainError> {
        self.require_turn(seat)?;
        let pending = self.pending.ok_or_else(|| {
            DomainError::invariant("variant selection without a pending bid")
        })?;
        match action {
            BidAction::Variant(v) => {
                self.variant = Some(v);
                self.finish(pending)
            }
            _ => Err(DomainError::validation(
                ValidationKind::InvalidBid,
                "only a variant choice is legal here",
            )),
        }
    }

    fn finish(&mut self, pending: PendingBid) -> Result<BidOutcome, DomainError> {
        let contract = Contract {
            mode: pending.mode,
            trump: pending.trump,
            bidder: self.effective_bidder(&pending),
            doubling_level: self.doubling_level,
            doubled_by: self.doubled_by,
            sun_doubled: self.sun_doubled,
            gahwa: self.gahwa,
            variant: self.variant,
        };
        debug!(?contract.mode, bidder = contract.bidder, level = contract.doubling_level, "contract finalized");
        self.phase = BidPhase::Finished;
        self.turn = None;
        self.contract = Some(contract.clone());
        Ok(BidOutcome::Contracted(contract))
    }
}
