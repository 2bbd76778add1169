// Season: rules, progress and the teams competing in a given year.

use std::path::Path;

use tracing::{error, info, warn};

use crate::config::{Rules, SeasonConfig};
use crate::directory::PlayerDirectory;
use crate::model::team::Team;
use crate::roster::{self, RosterError};

/// Games in a full regular season.
pub const SEASON_LENGTH_GAMES: f64 = 162.0;

/// The prior year whose stats back injury-returning players.
///
/// 2021 reaches back to 2019 because 2020 was a 60-game season.
pub fn last_year(year: i32) -> i32 {
    if year == 2021 {
        2019
    } else {
        year - 1
    }
}

/// Season year plus league-wide progress, threaded through valuation and
/// rating instead of being read from shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonContext {
    pub year: i32,
    /// Mean of (wins + losses) across every club in the league.
    pub average_games_played: f64,
}

impl SeasonContext {
    pub fn new(year: i32, average_games_played: f64) -> Self {
        Self {
            year,
            average_games_played,
        }
    }

    /// Fraction of the regular season played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let progress = self.average_games_played / SEASON_LENGTH_GAMES;
        if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn last_year(&self) -> i32 {
        last_year(self.year)
    }
}

/// A manager whose team could not be built.
#[derive(Debug, Clone)]
pub struct SkippedTeam {
    pub manager: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Season {
    pub year: i32,
    pub league_id: u32,
    pub managers: Vec<String>,
    pub rules: Rules,
    pub rating_precision: usize,
    pub context: SeasonContext,
    teams: Vec<Team>,
    skipped: Vec<SkippedTeam>,
}

impl Season {
    /// Assemble a season from already-built teams. Teams keep the order given.
    pub fn from_teams(
        config: &SeasonConfig,
        league_id: u32,
        context: SeasonContext,
        teams: Vec<Team>,
    ) -> Self {
        Self {
            year: config.year,
            league_id,
            managers: config.managers.clone(),
            rules: config.rules.clone(),
            rating_precision: config.rating_precision,
            context,
            teams,
            skipped: Vec::new(),
        }
    }

    /// Build every manager's team from `<rosters_dir>/<year>/<manager>.toml`.
    ///
    /// A missing or invalid roster drops only that manager; the season is
    /// still returned with the remaining teams.
    pub fn load(
        config: &SeasonConfig,
        league_id: u32,
        context: SeasonContext,
        rosters_dir: &Path,
        directory: &PlayerDirectory,
    ) -> Self {
        let mut season = Self::from_teams(config, league_id, context, Vec::new());

        for manager in &config.managers {
            let built = roster::load_roster(rosters_dir, config.year, manager).and_then(|spec| {
                Team::from_roster(manager, &spec, &season.context, &season.rules, directory)
            });

            match built {
                Ok(team) => season.teams.push(team),
                Err(e) => {
                    match &e {
                        RosterError::Missing { path } => {
                            warn!("Team file not found for {manager}: {}", path.display())
                        }
                        other => error!("Skipping team for {manager}: {other}"),
                    }
                    season.skipped.push(SkippedTeam {
                        manager: manager.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Season {} loaded: {} teams, {} skipped",
            season.year,
            season.teams.len(),
            season.skipped.len()
        );
        season
    }

    pub fn progress(&self) -> f64 {
        self.context.progress()
    }

    pub fn last_year(&self) -> i32 {
        last_year(self.year)
    }

    /// Teams in manager order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn teams_mut(&mut self) -> &mut [Team] {
        &mut self.teams
    }

    /// Managers whose rosters were missing or failed validation.
    pub fn skipped(&self) -> &[SkippedTeam] {
        &self.skipped
    }

    /// Case-insensitive lookup by manager name.
    pub fn team(&self, manager: &str) -> Option<&Team> {
        let key = manager.to_lowercase();
        self.teams.iter().find(|t| t.key() == key)
    }

    pub fn team_mut(&mut self, manager: &str) -> Option<&mut Team> {
        let key = manager.to_lowercase();
        self.teams.iter_mut().find(|t| t.key() == key)
    }

    /// Rules and progress as a pair, for valuation and rating calls.
    pub fn parts(&self) -> (&Rules, &SeasonContext) {
        (&self.rules, &self.context)
    }
}
