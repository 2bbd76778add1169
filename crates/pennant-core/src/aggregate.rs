// Group totals for hitters and pitchers, with rate stats derived from the sums.

use crate::model::player::{format_batting_average, format_era, format_innings_pitched, Hitter, Pitcher};
use crate::model::position::Role;

// ---------------------------------------------------------------------------
// Hitting
// ---------------------------------------------------------------------------

/// Summed hitting stats for a group of hitters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HittingSummary {
    pub ab: f64,
    pub runs: f64,
    pub hits: f64,
    pub hr: f64,
    pub rbi: f64,
    pub sb: f64,
}

impl HittingSummary {
    /// Batting average from the totals; 0 with no at-bats.
    pub fn avg(&self) -> f64 {
        if self.ab > 0.0 {
            self.hits / self.ab
        } else {
            0.0
        }
    }

    pub fn formatted_avg(&self) -> String {
        format_batting_average(self.avg())
    }

    fn add(&mut self, other: &HittingSummary, weight: f64) {
        self.ab += other.ab * weight;
        self.runs += other.runs * weight;
        self.hits += other.hits * weight;
        self.hr += other.hr * weight;
        self.rbi += other.rbi * weight;
        self.sb += other.sb * weight;
    }

    /// Combine group summaries, each counted at its role's weight. The
    /// combined average is recomputed from the weighted hits and at-bats.
    pub fn weighted(groups: &[(HittingSummary, Role)]) -> HittingSummary {
        let mut total = HittingSummary::default();
        for (summary, role) in groups {
            total.add(summary, role.weight());
        }
        total
    }
}

pub fn summarize_hitters(hitters: &[Hitter]) -> HittingSummary {
    hitters.iter().fold(HittingSummary::default(), |mut acc, h| {
        acc.ab += h.ab();
        acc.runs += h.runs();
        acc.hits += h.hits();
        acc.hr += h.hr();
        acc.rbi += h.rbi();
        acc.sb += h.sb();
        acc
    })
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

/// Summed pitching stats for a group of pitchers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchingSummary {
    /// Innings pitched, fractional (outs / 3).
    pub ip: f64,
    pub er: f64,
    pub wins: f64,
    pub saves: f64,
    pub strikeouts: f64,
    pub walks: f64,
}

impl PitchingSummary {
    /// Group ERA from the totals; 0 with no innings.
    pub fn era(&self) -> f64 {
        if self.ip > 0.0 {
            9.0 * self.er / self.ip
        } else {
            0.0
        }
    }

    pub fn formatted_ip(&self) -> String {
        format_innings_pitched(self.ip)
    }

    pub fn formatted_era(&self) -> String {
        format_era(self.era())
    }
}

pub fn summarize_pitchers(pitchers: &[Pitcher]) -> PitchingSummary {
    pitchers.iter().fold(PitchingSummary::default(), |mut acc, p| {
        acc.ip += p.ip();
        acc.er += p.er();
        acc.wins += p.wins();
        acc.saves += p.saves();
        acc.strikeouts += p.strikeouts();
        acc.walks += p.walks();
        acc
    })
}
