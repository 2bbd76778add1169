// A manager's validated roster, split into its five player groups.

use crate::aggregate::{self, HittingSummary, PitchingSummary};
use crate::config::Rules;
use crate::directory::PlayerDirectory;
use crate::model::player::{Hitter, Pitcher, Player, PlayerInfo, PlayerMut};
use crate::model::season::SeasonContext;
use crate::rating::{self, TeamRating};
use crate::roster::{self, RosterError, RosterSpec};
use crate::valuation;

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub manager: String,
    pub season_year: i32,
    pub starters: Vec<Hitter>,
    pub bench: Vec<Hitter>,
    pub rotation: Vec<Pitcher>,
    pub minors_hitters: Vec<Hitter>,
    pub minors_pitchers: Vec<Pitcher>,
}

impl Team {
    /// Validate a roster document and price every player on it.
    ///
    /// Fails without building anything if the roster breaks a structural rule.
    pub fn from_roster(
        manager: &str,
        spec: &RosterSpec,
        context: &SeasonContext,
        rules: &Rules,
        directory: &PlayerDirectory,
    ) -> Result<Self, RosterError> {
        let resolved = spec.resolve()?;
        roster::validate(&resolved, rules)?;

        let hitters = |entries: &[roster::RosterEntry]| {
            entries
                .iter()
                .map(|e| valuation::build_hitter(e, context, rules, directory))
                .collect::<Result<Vec<_>, _>>()
        };

        let starters = hitters(&resolved.starters)?;
        let bench = hitters(&resolved.bench)?;
        let rotation = resolved
            .rotation
            .iter()
            .map(|e| valuation::build_pitcher(e, context, rules, directory))
            .collect::<Result<Vec<_>, _>>()?;

        let mut minors_hitters = Vec::new();
        let mut minors_pitchers = Vec::new();
        for entry in &resolved.minors {
            match valuation::build_player(entry, context, rules, directory)? {
                Player::Hitter(h) => minors_hitters.push(h),
                Player::Pitcher(p) => minors_pitchers.push(p),
            }
        }

        Ok(Self {
            manager: manager.to_string(),
            season_year: context.year,
            starters,
            bench,
            rotation,
            minors_hitters,
            minors_pitchers,
        })
    }

    /// Lowercased manager name, used for lookups.
    pub fn key(&self) -> String {
        self.manager.to_lowercase()
    }

    /// Every player on the roster, hitters first.
    pub fn players(&self) -> Vec<&PlayerInfo> {
        self.starters
            .iter()
            .chain(&self.bench)
            .chain(&self.minors_hitters)
            .map(|h| &h.info)
            .chain(self.rotation.iter().chain(&self.minors_pitchers).map(|p| &p.info))
            .collect()
    }

    /// Mutable handles to every player, for a stats refresh.
    pub fn players_mut(&mut self) -> Vec<PlayerMut<'_>> {
        let mut players: Vec<PlayerMut<'_>> = Vec::new();
        players.extend(self.starters.iter_mut().map(PlayerMut::Hitter));
        players.extend(self.bench.iter_mut().map(PlayerMut::Hitter));
        players.extend(self.minors_hitters.iter_mut().map(PlayerMut::Hitter));
        players.extend(self.rotation.iter_mut().map(PlayerMut::Pitcher));
        players.extend(self.minors_pitchers.iter_mut().map(PlayerMut::Pitcher));
        players
    }

    pub fn starters_summary(&self) -> HittingSummary {
        aggregate::summarize_hitters(&self.starters)
    }

    pub fn bench_summary(&self) -> HittingSummary {
        aggregate::summarize_hitters(&self.bench)
    }

    pub fn rotation_summary(&self) -> PitchingSummary {
        aggregate::summarize_pitchers(&self.rotation)
    }

    pub fn minors_hitters_summary(&self) -> HittingSummary {
        aggregate::summarize_hitters(&self.minors_hitters)
    }

    pub fn minors_pitchers_summary(&self) -> PitchingSummary {
        aggregate::summarize_pitchers(&self.minors_pitchers)
    }

    pub fn offense(&self, context: &SeasonContext) -> f64 {
        rating::offense(self, context)
    }

    pub fn pitching(&self, context: &SeasonContext) -> f64 {
        rating::pitching(self, context)
    }

    pub fn innings_bonus_or_penalty(&self, rules: &Rules, context: &SeasonContext) -> f64 {
        rating::innings_bonus_or_penalty(self, rules, context)
    }

    pub fn rating(&self, rules: &Rules, context: &SeasonContext) -> TeamRating {
        rating::rate_team(self, rules, context)
    }
}
