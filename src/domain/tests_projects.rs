use crate::domain::cards_parsing::parse_cards;
use crate::domain::contract::GameMode;
use crate::domain::projects::{compare, scan, validate, Declaration, DeclarationBook, DeclarationType};
use crate::domain::{Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn scan_sun(tokens: &[&str]) -> Vec<Declaration> {
    scan(&parse_cards(tokens), 0, GameMode::Sun, None)
}

#[test]
fn five_card_run_is_one_hundred_never_a_split() {
    // The off-by-one trap: {A,K,Q,J,10} of spades is a single 5-card run
    // in SUN order, not a SIRA plus a FIFTY.
    let found = scan_sun(&["AS", "KS", "QS", "JS", "TS"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Hundred);
    assert_eq!(found[0].top_rank, Rank::Ace);
    assert_eq!(found[0].suit, Some(Suit::Spades));
    assert_eq!(found[0].proof.len(), 5);
}

#[test]
fn seven_card_run_is_still_one_declaration() {
    let found = scan_sun(&["7S", "8S", "9S", "JS", "QS", "KS", "TS"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Hundred);
    assert_eq!(found[0].top_rank, Rank::Ten);
}

#[test]
fn runs_of_three_and_four() {
    let found = scan_sun(&["7H", "8H", "9H"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Sira);
    assert_eq!(found[0].top_rank, Rank::Nine);

    // 9 and J are adjacent in SUN order, so 7-8-9-J is a run of four.
    let found = scan_sun(&["7H", "8H", "9H", "JH"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Fifty);
    assert_eq!(found[0].top_rank, Rank::Jack);
}

#[test]
fn runs_follow_sun_order_not_natural_order() {
    // 9-10-J is NOT contiguous in SUN order (10 sits above K).
    assert!(scan_sun(&["9H", "TH", "JH"]).is_empty());
    // 9-J-Q is.
    let found = scan_sun(&["9H", "JH", "QH"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Sira);
}

#[test]
fn runs_in_different_suits_are_separate() {
    let found = scan_sun(&["7H", "8H", "9H", "7S", "8S", "9S"]);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|d| d.decl_type == DeclarationType::Sira));
}

#[test]
fn four_aces_are_four_hundred_under_sun_only() {
    let hand = parse_cards(&["AC", "AD", "AH", "AS"]);
    let sun = scan(&hand, 0, GameMode::Sun, None);
    assert_eq!(sun.len(), 1);
    assert_eq!(sun[0].decl_type, DeclarationType::FourHundred);

    let ashkal = scan(&hand, 0, GameMode::Ashkal, None);
    assert_eq!(ashkal[0].decl_type, DeclarationType::FourHundred);

    let hokum = scan(&hand, 0, GameMode::Hokum, Some(Suit::Clubs));
    assert_eq!(hokum.len(), 1);
    assert_eq!(hokum[0].decl_type, DeclarationType::Hundred);
}

#[test]
fn four_of_a_kind_court_cards_are_hundred() {
    let found = scan_sun(&["KC", "KD", "KH", "KS"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Hundred);
    assert_eq!(found[0].top_rank, Rank::King);

    // Four nines (or eights, sevens) are worth nothing.
    assert!(scan_sun(&["9C", "9D", "9H", "9S"]).is_empty());
}

#[test]
fn baloot_needs_hokum_and_the_trump_pair() {
    let hand = parse_cards(&["KH", "QH", "7C"]);
    let found = scan(&hand, 2, GameMode::Hokum, Some(Suit::Hearts));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].decl_type, DeclarationType::Baloot);
    assert_eq!(found[0].suit, Some(Suit::Hearts));

    assert!(scan(&hand, 2, GameMode::Hokum, Some(Suit::Spades)).is_empty());
    assert!(scan(&hand, 2, GameMode::Sun, None).is_empty());
}

#[test]
fn baloot_is_independent_of_runs() {
    // J-Q-K of trump is both a SIRA and the baloot pair.
    let hand = parse_cards(&["JH", "QH", "KH"]);
    let found = scan(&hand, 0, GameMode::Hokum, Some(Suit::Hearts));
    let types: Vec<_> = found.iter().map(|d| d.decl_type).collect();
    assert!(types.contains(&DeclarationType::Sira));
    assert!(types.contains(&DeclarationType::Baloot));
    assert_eq!(found.len(), 2);
}

#[test]
fn validate_accepts_every_scanned_type() {
    let hand = parse_cards(&["7H", "8H", "9H", "KC", "KD", "KH", "KS"]);
    for decl in scan(&hand, 1, GameMode::Sun, None) {
        let confirmed = validate(&hand, 1, GameMode::Sun, None, decl.decl_type).unwrap();
        assert_eq!(confirmed, decl);
    }
}

#[test]
fn validate_rejects_unheld_combinations() {
    let hand = parse_cards(&["7H", "8H", "9H"]);
    let err = validate(&hand, 1, GameMode::Sun, None, DeclarationType::Fifty).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidDeclaration, _)
    ));
}

fn decl(decl_type: DeclarationType, suit: Suit, top_rank: Rank, seat: u8) -> Declaration {
    Declaration {
        decl_type,
        suit: Some(suit),
        top_rank,
        seat,
        proof: Vec::new(),
    }
}

#[test]
fn compare_prefers_higher_score() {
    let fifty = decl(DeclarationType::Fifty, Suit::Hearts, Rank::Ten, 0);
    let sira = decl(DeclarationType::Sira, Suit::Spades, Rank::Ace, 1);
    assert_eq!(compare(&fifty, &sira, 3), &fifty);
    assert_eq!(compare(&sira, &fifty, 3), &fifty);
}

#[test]
fn compare_breaks_score_ties_by_sun_top_rank() {
    let low = decl(DeclarationType::Sira, Suit::Hearts, Rank::King, 0);
    let high = decl(DeclarationType::Sira, Suit::Spades, Rank::Ten, 1);
    // Ten outranks King in SUN order.
    assert_eq!(compare(&low, &high, 3), &high);
}

#[test]
fn compare_breaks_full_ties_by_play_order_from_dealer() {
    let a = decl(DeclarationType::Sira, Suit::Hearts, Rank::Ace, 0);
    let b = decl(DeclarationType::Sira, Suit::Spades, Rank::Ace, 2);
    // Dealer 3: play order starts at seat 0, so seat 0 beats seat 2.
    assert_eq!(compare(&a, &b, 3), &a);
    // Dealer 1: play order starts at seat 2.
    assert_eq!(compare(&a, &b, 1), &b);
}

#[test]
fn duplicate_declarations_are_rejected_within_a_round() {
    let mut book = DeclarationBook::new();
    let sira = decl(DeclarationType::Sira, Suit::Hearts, Rank::Nine, 0);
    book.accept(&sira).unwrap();

    let err = book.accept(&sira).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::DuplicateDeclaration, _)
    ));

    // Partner's identical combo is the same team: still a repeat.
    let partner_sira = decl(DeclarationType::Sira, Suit::Hearts, Rank::Nine, 2);
    assert!(book.accept(&partner_sira).is_err());

    // A genuinely new declaration is fine.
    let other = decl(DeclarationType::Sira, Suit::Spades, Rank::Nine, 0);
    book.accept(&other).unwrap();

    // Opposing team may hold the mirror combo.
    let theirs = decl(DeclarationType::Sira, Suit::Hearts, Rank::Nine, 1);
    book.accept(&theirs).unwrap();

    // A new round starts fresh.
    book.reset_round();
    book.accept(&sira).unwrap();
}
