use crate::domain::bidding::{BidAction, BidOutcome, BidPhase, BiddingState};
use crate::domain::contract::{Contract, GameMode, HokumVariant, MAX_DOUBLING};
use crate::domain::Suit;
use crate::errors::domain::{DomainError, StateKind, ValidationKind};

fn finalize(state: &mut BiddingState, seat: u8, action: BidAction) -> Contract {
    match state.apply(seat, action).unwrap() {
        BidOutcome::Contracted(contract) => contract,
        other => panic!("expected a contract, got {other:?}"),
    }
}

#[test]
fn sun_bid_with_all_passes_finalizes() {
    // Dealer 3: seat 0 opens.
    let mut state = BiddingState::new(3);
    assert_eq!(state.phase(), BidPhase::RoundOne);
    assert_eq!(state.turn(), Some(0));

    state.apply(0, BidAction::Sun).unwrap();
    assert_eq!(state.phase(), BidPhase::GablakWindow);
    state.apply(1, BidAction::Pass).unwrap();
    state.apply(2, BidAction::Pass).unwrap();
    state.apply(3, BidAction::Pass).unwrap();
    assert_eq!(state.phase(), BidPhase::Doubling);

    // Opponents (team 1) decline to double.
    let contract = finalize(&mut state, 1, BidAction::Pass);
    assert_eq!(contract.mode, GameMode::Sun);
    assert_eq!(contract.bidder, 0);
    assert_eq!(contract.trump, None);
    assert_eq!(contract.doubling_level, 1);
    assert!(!contract.is_doubled());
    assert_eq!(state.phase(), BidPhase::Finished);
    assert_eq!(state.contract(), Some(&contract));
}

#[test]
fn out_of_turn_bids_are_rejected() {
    let mut state = BiddingState::new(3);
    let err = state.apply(2, BidAction::Pass).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
    // The machine is untouched.
    assert_eq!(state.turn(), Some(0));
}

#[test]
fn both_rounds_passed_out_is_a_redeal() {
    let mut state = BiddingState::new(0);
    for seat in [1, 2, 3, 0] {
        assert_eq!(state.apply(seat, BidAction::Pass).unwrap(), BidOutcome::InProgress);
    }
    assert_eq!(state.phase(), BidPhase::RoundTwo);
    assert_eq!(state.turn(), Some(1));

    for seat in [1, 2, 3] {
        state.apply(seat, BidAction::Pass).unwrap();
    }
    assert_eq!(state.apply(0, BidAction::Pass).unwrap(), BidOutcome::Redeal);
    assert_eq!(state.phase(), BidPhase::Finished);
    assert!(state.contract().is_none());

    // Nothing more is legal.
    let err = state.apply(1, BidAction::Sun).unwrap_err();
    assert!(matches!(err, DomainError::State(StateKind::PhaseMismatch, _)));
}

#[test]
fn round_two_bid_skips_the_gablak_window() {
    let mut state = BiddingState::new(0);
    for seat in [1, 2, 3, 0] {
        state.apply(seat, BidAction::Pass).unwrap();
    }
    state.apply(1, BidAction::Hokum(Suit::Hearts)).unwrap();
    assert_eq!(state.phase(), BidPhase::Doubling);

    let contract = finalize(&mut state, 0, BidAction::Pass);
    assert_eq!(contract.mode, GameMode::Hokum);
    assert_eq!(contract.trump, Some(Suit::Hearts));
    assert_eq!(contract.bidder, 1);
}

#[test]
fn gablak_override_replaces_the_opening_bid() {
    let mut state = BiddingState::new(3);
    state.apply(0, BidAction::Hokum(Suit::Spades)).unwrap();
    state.apply(1, BidAction::Pass).unwrap();
    state.apply(2, BidAction::Sun).unwrap();
    state.apply(3, BidAction::Pass).unwrap();
    assert_eq!(state.phase(), BidPhase::Doubling);

    // Seat 2 now owns the contract, so team 1 holds the doubling option.
    let contract = finalize(&mut state, 3, BidAction::Pass);
    assert_eq!(contract.mode, GameMode::Sun);
    assert_eq!(contract.bidder, 2);
    assert_eq!(contract.trump, None);
}

#[test]
fn gablak_window_rejects_escalation_actions() {
    let mut state = BiddingState::new(3);
    state.apply(0, BidAction::Sun).unwrap();
    let err = state.apply(1, BidAction::Double).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidBid, _)
    ));
}

#[test]
fn ashkal_is_credited_to_the_dealers_partner() {
    // Dealer 3: the opener (seat 0) sits left of the dealer and may ashkal.
    let mut state = BiddingState::new(3);
    state.apply(0, BidAction::Ashkal).unwrap();
    for seat in [1, 2, 3] {
        state.apply(seat, BidAction::Pass).unwrap();
    }
    let contract = finalize(&mut state, 0, BidAction::Pass);
    assert_eq!(contract.mode, GameMode::Ashkal);
    assert_eq!(contract.bidder, 1, "partner of dealer 3 carries the bid");
}

#[test]
fn ashkal_by_the_dealer_is_legal() {
    let mut state = BiddingState::new(0);
    for seat in [1, 2, 3] {
        state.apply(seat, BidAction::Pass).unwrap();
    }
    state.apply(0, BidAction::Ashkal).unwrap();
    assert_eq!(state.phase(), BidPhase::Doubling);
    let contract = finalize(&mut state, 1, BidAction::Pass);
    assert_eq!(contract.bidder, 2, "partner of dealer 0 carries the bid");
}

#[test]
fn ashkal_from_other_seats_is_rejected() {
    let mut state = BiddingState::new(0);
    state.apply(1, BidAction::Pass).unwrap();
    let err = state.apply(2, BidAction::Ashkal).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::IllegalAshkal, _)
    ));
}

/// Drive a plain hokum (trump hearts, bidder 0, dealer 3) to Doubling.
fn hokum_in_doubling() -> BiddingState {
    let mut state = BiddingState::new(3);
    state.apply(0, BidAction::Hokum(Suit::Hearts)).unwrap();
    for seat in [1, 2, 3] {
        state.apply(seat, BidAction::Pass).unwrap();
    }
    assert_eq!(state.phase(), BidPhase::Doubling);
    state
}

#[test]
fn doubling_alternates_between_teams() {
    let mut state = hokum_in_doubling();
    // The bidder's own team may not open the escalation.
    let err = state.apply(0, BidAction::Double).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));

    state.apply(1, BidAction::Double).unwrap();
    assert_eq!(state.doubling_level(), 2);
    // Now only the bidder's team may answer.
    assert!(state.apply(3, BidAction::Double).is_err());
    state.apply(0, BidAction::Double).unwrap();
    assert_eq!(state.doubling_level(), 3);
    state.apply(1, BidAction::Double).unwrap();
    assert_eq!(state.doubling_level(), MAX_DOUBLING);

    // The cascade is capped: a fifth double is illegal.
    let err = state.apply(0, BidAction::Double).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidBid, _)
    ));
}

#[test]
fn gahwa_caps_a_fully_doubled_hokum() {
    let mut state = hokum_in_doubling();
    // Gahwa before the cap is illegal.
    assert!(state.apply(1, BidAction::Gahwa).is_err());

    state.apply(1, BidAction::Double).unwrap();
    state.apply(0, BidAction::Double).unwrap();
    state.apply(1, BidAction::Double).unwrap();
    let contract = finalize(&mut state, 0, BidAction::Gahwa);
    assert!(contract.gahwa);
    assert_eq!(contract.doubling_level, MAX_DOUBLING);
    assert_eq!(contract.doubled_by, Some(0));
    assert_eq!(contract.variant, None, "gahwa skips variant selection");
}

#[test]
fn doubled_hokum_requires_a_variant_choice() {
    let mut state = hokum_in_doubling();
    state.apply(1, BidAction::Double).unwrap();
    state.apply(0, BidAction::Pass).unwrap();
    assert_eq!(state.phase(), BidPhase::VariantSelection);
    assert_eq!(state.turn(), Some(0), "the bidder picks the variant");

    let err = state.apply(0, BidAction::Pass).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidBid, _)
    ));

    let contract = finalize(&mut state, 0, BidAction::Variant(HokumVariant::Closed));
    assert_eq!(contract.doubling_level, 2);
    assert_eq!(contract.doubled_by, Some(1));
    assert_eq!(contract.variant, Some(HokumVariant::Closed));
    assert!(contract.is_doubled());
}

#[test]
fn sun_double_is_a_single_flag() {
    let mut state = BiddingState::new(3);
    state.apply(0, BidAction::Sun).unwrap();
    for seat in [1, 2, 3] {
        state.apply(seat, BidAction::Pass).unwrap();
    }
    // One double ends the escalation immediately, no variant phase.
    let contract = finalize(&mut state, 1, BidAction::Double);
    assert!(contract.sun_doubled);
    assert_eq!(contract.doubling_level, 1);
    assert_eq!(contract.doubled_by, Some(1));
    assert_eq!(contract.variant, None);
}

#[test]
fn undoubled_hokum_skips_variant_selection() {
    let mut state = hokum_in_doubling();
    let contract = finalize(&mut state, 1, BidAction::Pass);
    assert_eq!(contract.variant, None);
    assert_eq!(contract.doubling_level, 1);
}

#[test]
fn bid_rounds_reject_escalation_actions() {
    let mut state = BiddingState::new(3);
    let err = state.apply(0, BidAction::Double).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidBid, _)
    ));
    assert!(state.apply(0, BidAction::Gahwa).is_err());
}
