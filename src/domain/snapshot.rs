//! Serializable state snapshots for host broadcast.
//!
//! Every successful qayd operation returns one of these so the host can
//! fan the new state out to clients without reaching into the engine.

use serde::{Deserialize, Serialize};

use super::contract::Contract;
use super::qayd::{CardRef, QaydStep, QaydVerdict, ReporterClass};
use super::scoring::GamePointsResult;
use super::state::Seat;
use super::tricks::ViolationType;

/// Public view of the qayd state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QaydSnapshot {
    pub step: QaydStep,
    pub reporter: Option<Seat>,
    pub reporter_class: Option<ReporterClass>,
    /// Decision window the host should enforce for the reporter; the
    /// engine owns no timers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_window_secs: Option<u64>,
    pub violation: Option<ViolationType>,
    pub crime: Option<CardRef>,
    pub proof: Option<CardRef>,
    /// Set once the case has reached its verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<QaydVerdict>,
    pub game_locked: bool,
}

/// End-of-round broadcast: the finalized contract next to its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResultSnapshot {
    pub contract: Contract,
    pub result: GamePointsResult,
}
