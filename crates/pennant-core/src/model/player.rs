// Rostered players: shared identity plus hitting or pitching stat accessors.

use std::collections::HashMap;

use crate::config::Rules;
use crate::directory::team_abbreviation;
use crate::model::position::Position;
use crate::model::season::SeasonContext;
use crate::provider::{ProviderError, StatGroup, StatsProvider, YearStats};
use crate::roster::RosterError;
use crate::valuation;

// ---------------------------------------------------------------------------
// Stat keys (MLB Stats API field names)
// ---------------------------------------------------------------------------

pub const AT_BATS: &str = "atBats";
pub const RUNS: &str = "runs";
pub const HITS: &str = "hits";
pub const HOME_RUNS: &str = "homeRuns";
pub const RBI: &str = "rbi";
pub const STOLEN_BASES: &str = "stolenBases";

pub const OUTS: &str = "outs";
pub const EARNED_RUNS: &str = "earnedRuns";
pub const WINS: &str = "wins";
pub const SAVES: &str = "saves";
pub const STRIKEOUTS: &str = "strikeOuts";
pub const WALKS: &str = "baseOnBalls";

/// Hitting stats that scale with a player's multiplier.
pub const HITTING_COUNTING_STATS: [&str; 6] = [AT_BATS, RUNS, HITS, HOME_RUNS, RBI, STOLEN_BASES];

/// Pitching stats that scale with a player's multiplier. Outs and earned
/// runs are adjusted separately for off-year pitchers.
pub const PITCHING_COUNTING_STATS: [&str; 4] = [WINS, SAVES, STRIKEOUTS, WALKS];

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

pub fn format_batting_average(average: f64) -> String {
    format!("{average:.3}")
}

pub fn format_innings_pitched(innings_pitched: f64) -> String {
    format!("{innings_pitched:.2}")
}

pub fn format_era(earned_run_average: f64) -> String {
    format!("{earned_run_average:.2}")
}

// ---------------------------------------------------------------------------
// Shared identity
// ---------------------------------------------------------------------------

/// Fields common to hitters and pitchers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub mlb_id: u32,
    pub name: String,
    pub position: Position,
    pub season_year: i32,
    /// Year the player's stats are drawn from.
    pub stats_year: i32,
    /// Discount on counting stats, in [0, 1]. Zero only for an injury return
    /// before any games are played.
    pub multiplier: f64,
    /// Current club abbreviation, empty until stats are fetched.
    pub team: String,
    /// Stat snapshot for `stats_year`, empty until fetched.
    pub stats: HashMap<String, f64>,
}

impl PlayerInfo {
    pub fn new(
        mlb_id: u32,
        name: impl Into<String>,
        position: Position,
        season_year: i32,
        stats_year: i32,
        multiplier: f64,
    ) -> Result<Self, RosterError> {
        if !(0.0..=1.0).contains(&multiplier) {
            return Err(RosterError::InvalidMultiplier { mlb_id, multiplier });
        }
        Ok(Self {
            mlb_id,
            name: name.into(),
            position,
            season_year,
            stats_year,
            multiplier,
            team: String::new(),
            stats: HashMap::new(),
        })
    }

    /// A stat by API key, or 0 when absent.
    pub fn stat(&self, key: &str) -> f64 {
        self.stats.get(key).copied().unwrap_or(0.0)
    }

    pub fn profile_url(&self) -> String {
        format!("https://www.mlb.com/player/{}", self.mlb_id)
    }

    /// "63%" for a discounted player, " of 2023" for an off-year player, or
    /// both. Empty for a full-value, current-year player.
    pub fn notes(&self) -> String {
        let mut notes = String::new();
        if self.multiplier != 1.0 {
            notes.push_str(&format!("{}%", (self.multiplier * 100.0).round()));
        }
        if self.stats_year != self.season_year {
            notes.push_str(&format!(" of {}", self.stats_year));
        }
        notes
    }

    /// Replace the stat snapshot with the provider's record for `stats_year`.
    ///
    /// Stats and club are cleared first, so a failed fetch leaves the player
    /// at zero rather than carrying stale numbers.
    pub(crate) async fn load_stats(
        &mut self,
        provider: &dyn StatsProvider,
        group: StatGroup,
    ) -> Result<(), ProviderError> {
        self.stats.clear();
        self.team.clear();
        let response = provider.player_stats(self.mlb_id, group).await?;
        if let Some(team) = response.current_team.as_deref() {
            self.team = team_abbreviation(team);
        }
        if let Some(record) = select_stint(&response.stats_by_year, self.stats_year) {
            self.stats = record.stats.clone();
        }
        Ok(())
    }
}

/// The record for `year` with the most games played. Traded players have one
/// record per club.
pub fn select_stint(records: &[YearStats], year: i32) -> Option<&YearStats> {
    records
        .iter()
        .filter(|r| r.year == year)
        .max_by_key(|r| r.games_played)
}

// ---------------------------------------------------------------------------
// Hitter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Hitter {
    pub info: PlayerInfo,
}

impl Hitter {
    pub fn new(info: PlayerInfo) -> Result<Self, RosterError> {
        if !info.position.is_hitter() {
            return Err(RosterError::InvalidPosition {
                mlb_id: info.mlb_id,
                message: "pitchers cannot be position players".into(),
            });
        }
        Ok(Self { info })
    }

    pub fn ab(&self) -> f64 {
        self.info.stat(AT_BATS)
    }

    pub fn runs(&self) -> f64 {
        self.info.stat(RUNS)
    }

    pub fn hits(&self) -> f64 {
        self.info.stat(HITS)
    }

    pub fn hr(&self) -> f64 {
        self.info.stat(HOME_RUNS)
    }

    pub fn rbi(&self) -> f64 {
        self.info.stat(RBI)
    }

    pub fn sb(&self) -> f64 {
        self.info.stat(STOLEN_BASES)
    }

    pub fn avg(&self) -> f64 {
        let ab = self.ab();
        if ab > 0.0 {
            self.hits() / ab
        } else {
            0.0
        }
    }

    pub fn formatted_avg(&self) -> String {
        format_batting_average(self.avg())
    }

    /// Fetch this hitter's stats and apply the multiplier to counting stats.
    pub async fn fetch_stats(&mut self, provider: &dyn StatsProvider) -> Result<(), ProviderError> {
        self.info.load_stats(provider, StatGroup::Hitting).await?;
        valuation::scale_counting_stats(
            &mut self.info.stats,
            &HITTING_COUNTING_STATS,
            self.info.multiplier,
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pitcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Pitcher {
    pub info: PlayerInfo,
}

impl Pitcher {
    pub fn new(info: PlayerInfo) -> Result<Self, RosterError> {
        if info.position != Position::Pitcher {
            return Err(RosterError::InvalidPosition {
                mlb_id: info.mlb_id,
                message: format!("pitchers must be listed at P, not {}", info.position),
            });
        }
        Ok(Self { info })
    }

    /// Innings pitched, from outs (three per inning, fractional).
    pub fn ip(&self) -> f64 {
        self.info.stat(OUTS) / 3.0
    }

    pub fn er(&self) -> f64 {
        self.info.stat(EARNED_RUNS)
    }

    pub fn wins(&self) -> f64 {
        self.info.stat(WINS)
    }

    pub fn saves(&self) -> f64 {
        self.info.stat(SAVES)
    }

    pub fn strikeouts(&self) -> f64 {
        self.info.stat(STRIKEOUTS)
    }

    pub fn walks(&self) -> f64 {
        self.info.stat(WALKS)
    }

    pub fn era(&self) -> f64 {
        let ip = self.ip();
        if ip > 0.0 {
            9.0 * self.er() / ip
        } else {
            0.0
        }
    }

    pub fn formatted_ip(&self) -> String {
        format_innings_pitched(self.ip())
    }

    pub fn formatted_era(&self) -> String {
        format_era(self.era())
    }

    /// Fetch this pitcher's stats, prorate an off-year line, then apply the
    /// multiplier to counting stats. The order of the two steps matters.
    pub async fn fetch_stats(
        &mut self,
        provider: &dyn StatsProvider,
        context: &SeasonContext,
        rules: &Rules,
    ) -> Result<(), ProviderError> {
        self.info.load_stats(provider, StatGroup::Pitching).await?;
        if self.info.stats_year != context.year {
            valuation::prorate_off_year_pitching(&mut self.info.stats, context, rules);
        }
        valuation::scale_counting_stats(
            &mut self.info.stats,
            &PITCHING_COUNTING_STATS,
            self.info.multiplier,
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tagged variants
// ---------------------------------------------------------------------------

/// An owned player of either kind. Produced when building mixed groups such
/// as the minors.
#[derive(Debug, Clone, PartialEq)]
pub enum Player {
    Hitter(Hitter),
    Pitcher(Pitcher),
}

impl Player {
    pub fn info(&self) -> &PlayerInfo {
        match self {
            Player::Hitter(h) => &h.info,
            Player::Pitcher(p) => &p.info,
        }
    }
}

/// A mutable borrow of either kind of player, used to refresh a whole team
/// in one batch.
#[derive(Debug)]
pub enum PlayerMut<'a> {
    Hitter(&'a mut Hitter),
    Pitcher(&'a mut Pitcher),
}

impl PlayerMut<'_> {
    pub fn info(&self) -> &PlayerInfo {
        match self {
            PlayerMut::Hitter(h) => &h.info,
            PlayerMut::Pitcher(p) => &p.info,
        }
    }

    pub async fn fetch_stats(
        &mut self,
        provider: &dyn StatsProvider,
        context: &SeasonContext,
        rules: &Rules,
    ) -> Result<(), ProviderError> {
        match self {
            PlayerMut::Hitter(h) => h.fetch_stats(provider).await,
            PlayerMut::Pitcher(p) => p.fetch_stats(provider, context, rules).await,
        }
    }
}
