//! Qayd: the forensic accusation state machine.
//!
//! A player accuses an opponent of an illegal play already flagged
//! upstream in `PlayMetadata`. The engine walks the accusation through
//! card selection, adjudicates it against the upstream truth, and levies
//! the penalty. It never judges legality itself.
//!
//! Double jeopardy is prevented by two layers: a session-scoped set
//! cleared each round, and an injected persistent ledger that survives
//! round boundaries and reconnects.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::contract::Contract;
use super::scoring::qayd_penalty;
use super::snapshot::QaydSnapshot;
use super::state::{team_of, Seat, Team};
use super::tricks::{RoundHistory, ViolationType};
use crate::errors::domain::{DomainError, StateKind, ValidationKind};

/// Persistent signature store, injected at construction. Storage is the
/// host's concern (a key-value store in production); the engine only
/// defines the signature format.
pub trait QaydLedger {
    fn contains(&self, sig: &str) -> bool;
    fn put(&mut self, sig: &str);
}

/// In-memory ledger for tests and single-process hosts.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    sigs: HashSet<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QaydLedger for MemoryLedger {
    fn contains(&self, sig: &str) -> bool {
        self.sigs.contains(sig)
    }

    fn put(&mut self, sig: &str) {
        self.sigs.insert(sig.to_string());
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum QaydStep {
    Idle,
    MainMenu,
    ViolationSelect,
    SelectCard1,
    SelectCard2,
    Adjudication,
    Result,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReporterClass {
    Human,
    Automated,
}

/// Decision window the host should run for this reporter; the engine owns
/// no timers.
pub fn decision_window(class: ReporterClass) -> Duration {
    match class {
        ReporterClass::Human => Duration::from_secs(60),
        ReporterClass::Automated => Duration::from_secs(5),
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum MenuOption {
    Accuse,
    Withdraw,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// The accusation matched the upstream truth: accused team penalized.
    Correct,
    /// It did not: the reporting team pays for the frivolous accusation.
    Wrong,
}

/// Reference to one play: (trick index, card index within the trick).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    pub trick_idx: usize,
    pub card_idx: usize,
}

impl CardRef {
    /// Dedup signature format shared with the persistent ledger.
    pub fn signature(&self) -> String {
        format!("{}_{}", self.trick_idx, self.card_idx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaydVerdict {
    pub verdict: Verdict,
    pub penalized_team: Team,
    pub penalty_gp: u16,
}

/// An in-flight accusation. The case object is discarded once resolved;
/// only its signature persists.
#[derive(Debug, Clone)]
pub struct QaydCase {
    pub step: QaydStep,
    pub reporter: Seat,
    pub reporter_class: ReporterClass,
    pub violation: Option<ViolationType>,
    pub crime: Option<CardRef>,
    pub proof: Option<CardRef>,
}

#[derive(Debug)]
pub struct QaydEngine<L: QaydLedger> {
    case: Option<QaydCase>,
    session_reported: HashSet<String>,
    ledger: L,
    game_locked: bool,
    round_over: bool,
    last_verdict: Option<QaydVerdict>,
}

impl<L: QaydLedger> QaydEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            case: None,
            session_reported: HashSet::new(),
            ledger,
            game_locked: false,
            round_over: false,
            last_verdict: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.case.is_some()
    }

    pub fn is_game_locked(&self) -> bool {
        self.game_locked
    }

    /// Mark the round terminal: no new accusations until the next round.
    pub fn end_round(&mut self) {
        self.round_over = true;
    }

    /// New round: the session set clears, the persistent ledger does not.
    pub fn reset_round(&mut self) {
        self.session_reported.clear();
        self.round_over = false;
        self.last_verdict = None;
    }

    fn already_reported(&self, sig: &str) -> bool {
        self.session_reported.contains(sig) || self.ledger.contains(sig)
    }

    /// Find the first flagged-but-unreported violation: the unresolved
    /// trick has priority, then completed tricks oldest-first. Signatures
    /// already adjudicated are silently skipped.
    pub fn scan(&self, history: &RoundHistory) -> Option<CardRef> {
        if let Some(current) = &history.current {
            let trick_idx = history.current_trick_idx();
            for (card_idx, play) in current.plays.iter().enumerate() {
                let re = CardRef {
                    trick_idx,
                    card_idx,
                };
                if play.meta.is_illegal && !self.already_reported(&re.signature()) {
                    return Some(re);
                }
            }
        }
        for (trick_idx, trick) in history.completed.iter().enumerate() {
            for (card_idx, play) in trick.plays.iter().enumerate() {
                let re = CardRef {
                    trick_idx,
                    card_idx,
                };
                if play.meta.is_illegal && !self.already_reported(&re.signature()) {
                    return Some(re);
                }
            }
        }
        None
    }

    /// Open a case: locks the game and moves to the main menu. The host
    /// starts the reporter-class decision window returned in the snapshot.
    pub fn trigger(
        &mut self,
        seat: Seat,
        class: ReporterClass,
    ) -> Result<QaydSnapshot, DomainError> {
        if self.case.is_some() {
            return Err(DomainError::state(
                StateKind::AlreadyActive,
                "a qayd case is already in progress",
            ));
        }
        if self.game_locked {
            return Err(DomainError::state(
                StateKind::GameLocked,
                "game is locked",
            ));
        }
        if self.round_over {
            return Err(DomainError::state(
                StateKind::TerminalPhase,
                "round is over; nothing left to accuse",
            ));
        }
        self.game_locked = true;
        self.case = Some(QaydCase {
            step: QaydStep::MainMenu,
            reporter: seat,
            reporter_class: class,
            violation: None,
            crime: None,
            proof: None,
        });
        debug!(seat, ?class, "qayd triggered");
        Ok(self.snapshot())
    }

    pub fn select_menu_option(&mut self, opt: MenuOption) -> Result<QaydSnapshot, DomainError> {
        let case = self.require_step(QaydStep::MainMenu)?;
        match opt {
            MenuOption::Accuse => {
                case.step = QaydStep::ViolationSelect;
                Ok(self.snapshot())
            }
            MenuOption::Withdraw => self.cancel(),
        }
    }

    pub fn select_violation(
        &mut self,
        violation: ViolationType,
    ) -> Result<QaydSnapshot, DomainError> {
        let case = self.require_step(QaydStep::ViolationSelect)?;
        case.violation = Some(violation);
        case.step = QaydStep::SelectCard1;
        Ok(self.snapshot())
    }

    /// Point at the crime card.
    pub fn select_card_1(
        &mut self,
        re: CardRef,
        history: &RoundHistory,
    ) -> Result<QaydSnapshot, DomainError> {
        Self::require_play(history, re)?;
        let case = self.require_step(QaydStep::SelectCard1)?;
        case.crime = Some(re);
        case.step = QaydStep::SelectCard2;
        Ok(self.snapshot())
    }

    /// Point at the proof card and adjudicate. On reaching the result the
    /// case signature is written to both the session set and the ledger
    /// before the engine returns to idle.
    pub fn select_card_2(
        &mut self,
        re: CardRef,
        history: &RoundHistory,
        contract: &Contract,
        project_gp_on_table: u16,
    ) -> Result<QaydSnapshot, DomainError> {
        let proof_play = Self::require_play(history, re)?.clone();
        let case = self.require_step(QaydStep::SelectCard2)?;
        case.proof = Some(re);
        case.step = QaydStep::Adjudication;

        let crime_ref = case
            .crime
            .ok_or_else(|| DomainError::invariant("adjudication without a crime card"))?;
        let violation = case
            .violation
            .ok_or_else(|| DomainError::invariant("adjudication without a violation type"))?;
        let reporter = case.reporter;
        let crime_play = Self::require_play(history, crime_ref)?;

        // The assertion holds only if the flag, the claimed violation, and
        // the proof card all match the upstream truth.
        let correct = crime_play.meta.is_illegal
            && crime_play.meta.illegal_reason == Some(violation)
            && crime_play.meta.proof_hint == Some(proof_play.card);

        let (verdict, penalized_team) = if correct {
            (Verdict::Correct, team_of(crime_play.seat))
        } else {
            (Verdict::Wrong, team_of(reporter))
        };
        let result = QaydVerdict {
            verdict,
            penalized_team,
            penalty_gp: qayd_penalty(contract, project_gp_on_table),
        };
        debug!(?verdict, penalized_team, penalty = result.penalty_gp, "qayd adjudicated");

        let sig = crime_ref.signature();
        self.session_reported.insert(sig.clone());
        self.ledger.put(&sig);

        if let Some(case) = self.case.as_mut() {
            case.step = QaydStep::Result;
        }
        self.last_verdict = Some(result);
        let snapshot = self.snapshot();

        // Terminal: discard the case, keep only its signature.
        self.case = None;
        self.game_locked = false;
        Ok(snapshot)
    }

    /// Abort an in-flight case before it reaches a verdict.
    pub fn cancel(&mut self) -> Result<QaydSnapshot, DomainError> {
        if self.case.is_none() {
            return Err(DomainError::state(
                StateKind::NotActive,
                "no qayd case in progress",
            ));
        }
        self.case = None;
        self.game_locked = false;
        debug!("qayd cancelled");
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> QaydSnapshot {
        match &self.case {
            None => QaydSnapshot {
                step: QaydStep::Idle,
                reporter: None,
                reporter_class: None,
                decision_window_secs: None,
                violation: None,
                crime: None,
                proof: None,
                verdict: self.last_verdict.clone(),
                game_locked: self.game_locked,
            },
            Some(case) => QaydSnapshot {
                step: case.step,
                reporter: Some(case.reporter),
                reporter_class: Some(case.reporter_class),
                decision_window_secs: Some(decision_window(case.reporter_class).as_secs()),
                violation: case.violation,
                crime: case.crime,
                proof: case.proof,
                verdict: self.last_verdict.clone(),
                game_locked: self.game_locked,
            },
        }
    }

    fn require_step(&mut self, step: QaydStep) -> Result<&mut QaydCase, DomainError> {
        match self.case.as_mut() {
            Some(case) if case.step == step => Ok(case),
            Some(case) => Err(DomainError::state(
                StateKind::PhaseMismatch,
                format!("expected step {step:?}, case is at {:?}", case.step),
            )),
            None => Err(DomainError::state(
                StateKind::NotActive,
                "no qayd case in progress",
            )),
        }
    }

    fn require_play(
        history: &RoundHistory,
        re: CardRef,
    ) -> Result<&super::tricks::TrickPlay, DomainError> {
        history.play_at(re.trick_idx, re.card_idx).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidCardRef,
                format!("no play at trick {} card {}", re.trick_idx, re.card_idx),
            )
        })
    }
}
