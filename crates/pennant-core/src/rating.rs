// Team rating: offense + pitching + innings bonus/penalty.
//
// Ratings are unbounded and only meaningful relative to other teams in the
// same season.

use crate::aggregate::{HittingSummary, PitchingSummary};
use crate::config::Rules;
use crate::model::position::Role;
use crate::model::season::SeasonContext;
use crate::model::team::Team;

/// Batting average treated as neutral by the offense score.
const BASELINE_AVG_POINTS: f64 = 250.0;

/// A team's rating and its three components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamRating {
    pub offense: f64,
    pub pitching: f64,
    pub innings_bonus_or_penalty: f64,
    pub rating: f64,
}

impl TeamRating {
    /// Rating rounded to `precision` decimal places for display.
    pub fn formatted(&self, precision: usize) -> String {
        format!("{:.*}", precision, self.rating)
    }
}

// ---------------------------------------------------------------------------
// Scores from summaries
// ---------------------------------------------------------------------------

/// `(R + RBI)/2 + HR/4 + SB/5 + (AVG·1000 − 250)·progress`.
///
/// Scaling the average term by progress keeps small early-season samples
/// from swinging the rating.
pub fn offense_score(totals: &HittingSummary, progress: f64) -> f64 {
    let counting = (totals.runs + totals.rbi) / 2.0 + totals.hr / 4.0 + totals.sb / 5.0;
    counting + (totals.avg() * 1000.0 - BASELINE_AVG_POINTS) * progress
}

/// `W + SV/3 + (K − BB)/10 − ERA·average_games_played`.
pub fn pitching_score(rotation: &PitchingSummary, average_games_played: f64) -> f64 {
    let counting = rotation.wins + rotation.saves / 3.0 + (rotation.strikeouts - rotation.walks) / 10.0;
    counting - rotation.era() * average_games_played
}

/// Reward or penalty for rotation innings against the prorated threshold.
/// Surplus and deficit are weighted separately.
pub fn innings_score(rotation_ip: f64, rules: &Rules, progress: f64) -> f64 {
    let delta = rotation_ip - rules.team_innings_threshold * progress;
    if delta >= 0.0 {
        delta * rules.innings_surplus_multiplier
    } else {
        delta * rules.innings_deficit_multiplier
    }
}

// ---------------------------------------------------------------------------
// Team-level
// ---------------------------------------------------------------------------

/// Starters at full weight plus bench at half weight. Minors never count.
pub fn hitting_totals(team: &Team) -> HittingSummary {
    HittingSummary::weighted(&[
        (team.starters_summary(), Role::Starter),
        (team.bench_summary(), Role::Bench),
    ])
}

pub fn offense(team: &Team, context: &SeasonContext) -> f64 {
    offense_score(&hitting_totals(team), context.progress())
}

pub fn pitching(team: &Team, context: &SeasonContext) -> f64 {
    pitching_score(&team.rotation_summary(), context.average_games_played)
}

pub fn innings_bonus_or_penalty(team: &Team, rules: &Rules, context: &SeasonContext) -> f64 {
    innings_score(team.rotation_summary().ip, rules, context.progress())
}

pub fn rate_team(team: &Team, rules: &Rules, context: &SeasonContext) -> TeamRating {
    let offense = offense(team, context);
    let pitching = pitching(team, context);
    let innings_bonus_or_penalty = innings_bonus_or_penalty(team, rules, context);
    TeamRating {
        offense,
        pitching,
        innings_bonus_or_penalty,
        rating: offense + pitching + innings_bonus_or_penalty,
    }
}
