// Collaborator interfaces for player statistics and league standings.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

// ---------------------------------------------------------------------------
// Player statistics
// ---------------------------------------------------------------------------

/// Which side of the ball a stats request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatGroup {
    Hitting,
    Pitching,
}

impl StatGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatGroup::Hitting => "hitting",
            StatGroup::Pitching => "pitching",
        }
    }
}

impl fmt::Display for StatGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stint's worth of stats. A player traded mid-season has several
/// records for the same year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearStats {
    pub year: i32,
    pub games_played: u32,
    pub stats: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatsResponse {
    /// Full club name, e.g. "Seattle Mariners".
    pub current_team: Option<String>,
    pub stats_by_year: Vec<YearStats>,
}

#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Year-by-year stats for a player in the given group.
    async fn player_stats(
        &self,
        player_id: u32,
        group: StatGroup,
    ) -> Result<PlayerStatsResponse, ProviderError>;
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DivisionStandings {
    pub name: String,
    pub teams: Vec<TeamRecord>,
}

#[async_trait]
pub trait StandingsProvider: Send + Sync {
    /// Per-division win/loss records for a league and season.
    async fn standings(
        &self,
        league_id: u32,
        year: i32,
    ) -> Result<Vec<DivisionStandings>, ProviderError>;
}
