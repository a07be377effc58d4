//! The numeric pipeline from raw trick points to Game Points (GP).
//!
//! Raw card-point inputs always include the +10 last-trick bonus, so a SUN
//! round's raw totals sum to 130 (120 card points + 10) and a HOKUM
//! round's to 162 (152 + 10). The conversions then land exactly on the
//! fixed per-round GP targets: 26 for SUN, 16 for HOKUM.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::contract::{Contract, GameMode};
use super::projects::{Declaration, DeclarationType};
use super::state::{other_team, Team, TEAMS};
use super::tricks::{resolve_trick, TrickRecord};
use crate::errors::domain::DomainError;

pub const LAST_TRICK_BONUS: u16 = 10;
/// Raw card-point total per round, bonus included.
pub const SUN_RAW_TOTAL: u16 = 130;
pub const HOKUM_RAW_TOTAL: u16 = 162;
/// Fixed per-round card-GP targets both teams must sum to.
pub const SUN_CARD_GP_TARGET: u16 = 26;
pub const HOKUM_CARD_GP_TARGET: u16 = 16;
/// Kaboot (clean sweep) card-GP bases.
pub const KABOOT_BASE_SUN: u16 = 44;
pub const KABOOT_BASE_HOKUM: u16 = 25;
/// Flat round total awarded when the gahwa sentinel fired.
pub const GAHWA_FLAT_GP: u16 = 152;
/// Flat bonus per valid baloot, immune to rounding and multipliers.
pub const BALOOT_GP: u16 = 2;
pub const TRICKS_PER_ROUND: u8 = 8;

/// Per-round raw totals feeding the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTally {
    /// Raw card points per team, +10 last-trick bonus included.
    pub card_points: [u16; TEAMS],
    /// Canonical declared-project values per team, baloot excluded.
    pub project_points: [u16; TEAMS],
    /// Project GP per team (per-declaration conversion, baloot excluded).
    pub project_gp: [u16; TEAMS],
    pub baloot_count: [u8; TEAMS],
    pub tricks_won: [u8; TEAMS],
    /// The round's point-majority winner.
    pub majority_team: Team,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePointsResult {
    pub team_gp: [u16; TEAMS],
    pub round_winner: Team,
    pub khasara: bool,
}

/// Step 1, SUN: closed-form card-GP conversion.
///
/// For any split summing to 130 the two teams' results sum to exactly 26:
/// when both remainders are nonzero they total 5, so exactly one quotient
/// is odd and exactly one side rounds up.
pub fn card_gp_sun(raw: u16) -> u16 {
    let q = raw / 5;
    let r = raw % 5;
    q + u16::from(q % 2 == 1 && r > 0)
}

/// Step 1, HOKUM: per-team rounding constrained to sum to exactly 16.
///
/// Each team rounds independently (up on remainder > 5), then the pair is
/// corrected: at 17 the smaller-remainder team gives one back, at 15 the
/// larger-remainder team takes one. Remainder ties fall back to raw
/// magnitude.
pub fn card_gp_hokum_pair(raw: [u16; TEAMS]) -> [u16; TEAMS] {
    let q = [raw[0] / 10, raw[1] / 10];
    let r = [raw[0] % 10, raw[1] % 10];
    let mut gp = [q[0] + u16::from(r[0] > 5), q[1] + u16::from(r[1] > 5)];

    let sum = gp[0] + gp[1];
    if sum == HOKUM_CARD_GP_TARGET + 1 {
        let loser = if r[0] != r[1] {
            usize::from(r[1] < r[0])
        } else {
            usize::from(raw[1] < raw[0])
        };
        gp[loser] = gp[loser].saturating_sub(1);
    } else if sum == HOKUM_CARD_GP_TARGET - 1 {
        let gainer = if r[0] != r[1] {
            usize::from(r[1] > r[0])
        } else {
            usize::from(raw[1] > raw[0])
        };
        gp[gainer] += 1;
    }
    gp
}

/// Step 2: project value to project GP, per declaration.
///
/// FOUR_HUNDRED is pinned at 40 rather than the formula's 80. Baloot is
/// excluded here; step 5 adds it as a flat bonus.
pub fn declaration_gp(decl_type: DeclarationType, mode: GameMode) -> u16 {
    match decl_type {
        DeclarationType::Baloot => 0,
        DeclarationType::FourHundred => 40,
        other => {
            let value = other.canonical_score();
            if mode.uses_sun_scoring() {
                (value * 2) / 10
            } else {
                value / 10
            }
        }
    }
}

/// Build the pipeline inputs from a full round of tricks and the accepted
/// declarations. The +10 bonus goes to the team that took the last trick.
pub fn tally_round(
    tricks: &[TrickRecord],
    contract: &Contract,
    declarations: &[Declaration],
) -> Result<RoundTally, DomainError> {
    if tricks.len() != TRICKS_PER_ROUND as usize {
        return Err(DomainError::invariant(format!(
            "round tallied with {} tricks, expected {TRICKS_PER_ROUND}",
            tricks.len()
        )));
    }

    let mut card_points = [0u16; TEAMS];
    let mut tricks_won = [0u8; TEAMS];
    let mut last_winner_team = 0;
    for trick in tricks {
        let outcome = resolve_trick(trick, contract)?;
        let team = super::state::team_of(outcome.winner) as usize;
        card_points[team] += outcome.points;
        tricks_won[team] += 1;
        last_winner_team = team;
    }
    card_points[last_winner_team] += LAST_TRICK_BONUS;

    let mut project_points = [0u16; TEAMS];
    let mut project_gp = [0u16; TEAMS];
    let mut baloot_count = [0u8; TEAMS];
    for decl in declarations {
        let team = decl.team() as usize;
        if decl.decl_type == DeclarationType::Baloot {
            baloot_count[team] += 1;
        } else {
            project_points[team] += decl.score();
            project_gp[team] += declaration_gp(decl.decl_type, contract.mode);
        }
    }

    let bidder = contract.bidder_team();
    let majority_team = match card_points[0].cmp(&card_points[1]) {
        std::cmp::Ordering::Greater => 0,
        std::cmp::Ordering::Less => 1,
        // Raw ties track the khasara tie-break: SUN keeps the bidder ahead,
        // HOKUM hands the majority to the opponents.
        std::cmp::Ordering::Equal => {
            if contract.mode.uses_sun_scoring() {
                bidder
            } else {
                other_team(bidder)
            }
        }
    };

    Ok(RoundTally {
        card_points,
        project_points,
        project_gp,
        baloot_count,
        tricks_won,
        majority_team,
    })
}

/// Steps 1-6: convert a round tally into the teams' Game Points.
pub fn compute_game_points(
    tally: &RoundTally,
    contract: &Contract,
) -> Result<GamePointsResult, DomainError> {
    let sun_scoring = contract.mode.uses_sun_scoring();
    let expected_raw = if sun_scoring {
        SUN_RAW_TOTAL
    } else {
        HOKUM_RAW_TOTAL
    };
    let raw_sum = tally.card_points[0] + tally.card_points[1];
    if raw_sum != expected_raw {
        return Err(DomainError::invariant(format!(
            "raw card points sum to {raw_sum}, expected {expected_raw}"
        )));
    }
    if sun_scoring && (tally.baloot_count[0] > 0 || tally.baloot_count[1] > 0) {
        return Err(DomainError::invariant("baloot counted in a no-trump round"));
    }

    let bidder = contract.bidder_team();
    let opponents = other_team(bidder);
    let baloot_gp = [
        tally.baloot_count[0] as u16 * BALOOT_GP,
        tally.baloot_count[1] as u16 * BALOOT_GP,
    ];
    let baloot_total = baloot_gp[0] + baloot_gp[1];
    let project_total = tally.project_gp[0] + tally.project_gp[1];

    // Gahwa bypasses everything: flat total to the majority, baloot void.
    if contract.gahwa {
        let winner = tally.majority_team;
        let mut team_gp = [0u16; TEAMS];
        team_gp[winner as usize] = GAHWA_FLAT_GP;
        debug!(winner, "gahwa round: flat total");
        return Ok(GamePointsResult {
            team_gp,
            round_winner: winner,
            khasara: winner != bidder,
        });
    }

    // Kaboot overrides the card-point steps with a fixed base.
    for team in 0..TEAMS as u8 {
        if tally.tricks_won[team as usize] == TRICKS_PER_ROUND {
            let base = if sun_scoring {
                KABOOT_BASE_SUN
            } else {
                KABOOT_BASE_HOKUM
            };
            let mut team_gp = [0u16; TEAMS];
            team_gp[team as usize] = base + project_total + baloot_total;
            debug!(winner = team, "kaboot: clean sweep");
            return Ok(GamePointsResult {
                team_gp,
                round_winner: team,
                khasara: team != bidder,
            });
        }
    }

    // Step 1: card points to card GP.
    let card_gp = if sun_scoring {
        [
            card_gp_sun(tally.card_points[0]),
            card_gp_sun(tally.card_points[1]),
        ]
    } else {
        card_gp_hokum_pair(tally.card_points)
    };
    let target = if sun_scoring {
        SUN_CARD_GP_TARGET
    } else {
        HOKUM_CARD_GP_TARGET
    };
    if card_gp[0] + card_gp[1] != target {
        return Err(DomainError::invariant(format!(
            "card GP sum {} missed the fixed target {target}",
            card_gp[0] + card_gp[1]
        )));
    }

    // Step 2 result: pre-multiplier GP per team, baloot still excluded.
    let gp = [
        card_gp[0] + tally.project_gp[0],
        card_gp[1] + tally.project_gp[1],
    ];
    let combined = gp[0] + gp[1];

    // Step 4a: doubled HOKUM is winner-takes-all, scaled by the level.
    // On a GP tie the doubling team loses regardless of raw points.
    // Baloot stays flat: it lands after the multiplier, never inside it.
    if contract.mode == GameMode::Hokum && contract.is_doubled() {
        let loser = match gp[0].cmp(&gp[1]) {
            std::cmp::Ordering::Less => 0,
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Equal => contract.doubled_by.ok_or_else(|| {
                DomainError::invariant("doubled contract without a doubling team")
            })?,
        };
        let winner = other_team(loser);
        let mut team_gp = [0u16; TEAMS];
        team_gp[winner as usize] = combined * contract.doubling_level as u16 + baloot_total;
        debug!(winner, level = contract.doubling_level, "doubled round settled");
        return Ok(GamePointsResult {
            team_gp,
            round_winner: winner,
            khasara: loser == bidder,
        });
    }

    // Step 4b: the independent SUN double assigns the doubled round total
    // to the point-majority winner, independent of khasara.
    if sun_scoring && contract.sun_doubled {
        let winner = tally.majority_team;
        let mut team_gp = [0u16; TEAMS];
        team_gp[winner as usize] = combined * 2;
        debug!(winner, "sun double settled");
        return Ok(GamePointsResult {
            team_gp,
            round_winner: winner,
            khasara: winner != bidder,
        });
    }

    // Step 3: khasara. Equal GP falls back to raw points; HOKUM gives the
    // raw tie to the opponents, SUN to the bidder.
    let (b, o) = (bidder as usize, opponents as usize);
    let khasara = gp[b] < gp[o]
        || (gp[b] == gp[o]
            && if sun_scoring {
                tally.card_points[b] < tally.card_points[o]
            } else {
                tally.card_points[b] <= tally.card_points[o]
            });

    let mut team_gp = [0u16; TEAMS];
    if khasara {
        // Step 5 under redistribution: baloot transfers with the rest.
        team_gp[o] = combined + baloot_total;
        debug!(winner = opponents, "khasara: contract failed");
    } else {
        team_gp[0] = gp[0] + baloot_gp[0];
        team_gp[1] = gp[1] + baloot_gp[1];
    }

    Ok(GamePointsResult {
        team_gp,
        round_winner: if khasara { opponents } else { bidder },
        khasara,
    })
}

/// Penalty a qayd verdict levies on the losing side: the full round's
/// card-GP base for the mode, scaled by the doubling level, plus whatever
/// project GP is on the table.
pub fn qayd_penalty(contract: &Contract, project_gp_on_table: u16) -> u16 {
    let base = if contract.mode.uses_sun_scoring() {
        SUN_CARD_GP_TARGET
    } else {
        HOKUM_CARD_GP_TARGET
    };
    let scaled = if contract.is_doubled() {
        base * contract.doubling_level as u16
    } else {
        base
    };
    scaled + project_gp_on_table
}
