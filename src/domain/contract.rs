//! The finalized contract a round is played under.

use serde::{Deserialize, Serialize};

use super::cards_types::Suit;
use super::state::{team_of, Seat, Team};

/// Contract mode. ASHKAL plays and scores like SUN; it differs only in
/// who may declare it and in crediting the dealer's partner as bidder.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Sun,
    Hokum,
    Ashkal,
}

impl GameMode {
    /// SUN and ASHKAL share rank order, point table, and GP conversion.
    pub fn uses_sun_scoring(self) -> bool {
        !matches!(self, GameMode::Hokum)
    }
}

/// Variant chosen by the bidder of a doubled HOKUM contract.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum HokumVariant {
    Open,
    Closed,
}

/// Highest numeric doubling level; beyond it only the gahwa sentinel
/// remains.
pub const MAX_DOUBLING: u8 = 4;

/// Immutable once bidding finishes; discarded at round end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub mode: GameMode,
    /// Set iff mode is HOKUM.
    pub trump: Option<Suit>,
    pub bidder: Seat,
    /// 1 = undoubled; 2..=MAX_DOUBLING for the HOKUM escalation cascade.
    pub doubling_level: u8,
    /// Team that declared the last escalation (owns the doubled tie-break).
    pub doubled_by: Option<Team>,
    /// Independent single-level SUN double/redouble flag.
    pub sun_doubled: bool,
    /// Flat-escalation sentinel: bypasses the scoring pipeline.
    pub gahwa: bool,
    pub variant: Option<HokumVariant>,
}

impl Contract {
    pub fn bidder_team(&self) -> Team {
        team_of(self.bidder)
    }

    pub fn is_doubled(&self) -> bool {
        self.doubling_level >= 2
    }
}
