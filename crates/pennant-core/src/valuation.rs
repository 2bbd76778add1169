// Player valuation: which year a player's stats come from, how heavily they
// are discounted, and the post-fetch adjustments that apply the discount.

use std::collections::HashMap;

use crate::config::Rules;
use crate::directory::PlayerDirectory;
use crate::model::player::{Hitter, Pitcher, Player, PlayerInfo, EARNED_RUNS, OUTS};
use crate::model::position::Position;
use crate::model::season::SeasonContext;
use crate::roster::{RosterEntry, RosterError};

/// Stats year and counting-stat multiplier for one roster entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub stats_year: i32,
    pub multiplier: f64,
}

/// Price a roster entry.
///
/// - `injury_move`: prior-year stats at `injury_efficacy × progress`, so a
///   late return is worth less than an early one.
/// - `minors_penalty`: a further `minors_penalty` factor for hitters,
///   compounding with the injury discount when both are set. Pitchers ignore
///   the flag.
/// - An explicit stats year on the entry overrides the year only.
pub fn value_entry(entry: &RosterEntry, context: &SeasonContext, rules: &Rules) -> Valuation {
    let mut stats_year = context.year;
    let mut multiplier = 1.0;

    if entry.injury_move {
        stats_year = context.last_year();
        multiplier = rules.injury_efficacy * context.progress();
    }
    if entry.minors_penalty && entry.position.is_hitter() {
        multiplier *= rules.minors_penalty;
    }
    if let Some(year) = entry.stats_year {
        stats_year = year;
    }

    Valuation {
        stats_year,
        multiplier,
    }
}

fn player_info(
    entry: &RosterEntry,
    context: &SeasonContext,
    rules: &Rules,
    directory: &PlayerDirectory,
) -> Result<PlayerInfo, RosterError> {
    let valuation = value_entry(entry, context, rules);
    PlayerInfo::new(
        entry.mlb_id,
        directory.name(entry.mlb_id),
        entry.position,
        context.year,
        valuation.stats_year,
        valuation.multiplier,
    )
}

pub fn build_hitter(
    entry: &RosterEntry,
    context: &SeasonContext,
    rules: &Rules,
    directory: &PlayerDirectory,
) -> Result<Hitter, RosterError> {
    Hitter::new(player_info(entry, context, rules, directory)?)
}

pub fn build_pitcher(
    entry: &RosterEntry,
    context: &SeasonContext,
    rules: &Rules,
    directory: &PlayerDirectory,
) -> Result<Pitcher, RosterError> {
    Pitcher::new(player_info(entry, context, rules, directory)?)
}

/// Build a hitter or pitcher depending on the entry's position.
pub fn build_player(
    entry: &RosterEntry,
    context: &SeasonContext,
    rules: &Rules,
    directory: &PlayerDirectory,
) -> Result<Player, RosterError> {
    if entry.position == Position::Pitcher {
        build_pitcher(entry, context, rules, directory).map(Player::Pitcher)
    } else {
        build_hitter(entry, context, rules, directory).map(Player::Hitter)
    }
}

// ---------------------------------------------------------------------------
// Post-fetch adjustments
// ---------------------------------------------------------------------------

/// Multiply the listed counting stats by `multiplier`. Keys missing from the
/// snapshot stay missing. A multiplier of exactly 1 is a no-op.
pub fn scale_counting_stats(stats: &mut HashMap<String, f64>, keys: &[&str], multiplier: f64) {
    if multiplier == 1.0 {
        return;
    }
    for key in keys {
        if let Some(value) = stats.get_mut(*key) {
            *value *= multiplier;
        }
    }
}

/// Prorate a prior-year pitching line to the share of this season it is
/// expected to cover.
///
/// Outs scale by the injured-innings multiplier and progress; earned runs
/// additionally by the ERA multiplier, so the implied ERA rises by exactly
/// that factor while innings shrink.
pub fn prorate_off_year_pitching(
    stats: &mut HashMap<String, f64>,
    context: &SeasonContext,
    rules: &Rules,
) {
    let progress = context.progress();
    let ip_multiplier = rules.injured_pitcher_innings_multiplier;
    let er_multiplier = rules.injured_pitcher_era_multiplier;

    let outs = stats.get(OUTS).copied().unwrap_or(0.0);
    let earned_runs = stats.get(EARNED_RUNS).copied().unwrap_or(0.0);

    stats.insert(OUTS.to_string(), outs * ip_multiplier * progress);
    stats.insert(
        EARNED_RUNS.to_string(),
        earned_runs * ip_multiplier * er_multiplier * progress,
    );
}
