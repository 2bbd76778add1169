// Standings: refresh every player's stats concurrently, then rank teams.

use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::Rules;
use crate::model::player::PlayerMut;
use crate::model::season::{Season, SeasonContext};
use crate::model::team::Team;
use crate::provider::StatsProvider;
use crate::rating::TeamRating;

/// Outcome of a stats refresh batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub fetched: usize,
    pub failed: usize,
}

/// One row of the standings table.
#[derive(Debug, Clone)]
pub struct Standing<'a> {
    /// 1-based.
    pub rank: usize,
    pub team: &'a Team,
    pub rating: TeamRating,
}

/// Fetch stats for a batch of players with at most `limit` requests in
/// flight, returning once every fetch has finished.
///
/// A failed fetch leaves that player with empty stats and is logged; it does
/// not stop the rest of the batch.
pub async fn refresh_players(
    players: Vec<PlayerMut<'_>>,
    provider: &dyn StatsProvider,
    context: &SeasonContext,
    rules: &Rules,
    limit: usize,
) -> RefreshReport {
    let outcomes: Vec<bool> = stream::iter(players)
        .map(|mut player| async move {
            match player.fetch_stats(provider, context, rules).await {
                Ok(()) => true,
                Err(e) => {
                    let info = player.info();
                    warn!("Stats fetch failed for {} ({}): {e}", info.name, info.mlb_id);
                    false
                }
            }
        })
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    let failed = outcomes.iter().filter(|ok| !**ok).count();
    RefreshReport {
        fetched: outcomes.len() - failed,
        failed,
    }
}

/// Refresh one team's players, e.g. for a single-team view.
pub async fn refresh_team(
    team: &mut Team,
    provider: &dyn StatsProvider,
    context: &SeasonContext,
    rules: &Rules,
    limit: usize,
) -> RefreshReport {
    refresh_players(team.players_mut(), provider, context, rules, limit).await
}

/// Refresh every player on every team as a single batch.
pub async fn refresh_season(season: &mut Season, provider: &dyn StatsProvider, limit: usize) -> RefreshReport {
    let rules = season.rules.clone();
    let context = season.context;

    let players: Vec<PlayerMut<'_>> = season
        .teams_mut()
        .iter_mut()
        .flat_map(|team| team.players_mut())
        .collect();

    let report = refresh_players(players, provider, &context, &rules, limit).await;

    if report.failed > 0 {
        warn!(
            "Season {} refresh: {} players fetched, {} failed",
            context.year, report.fetched, report.failed
        );
    } else {
        info!("Season {} refresh: {} players fetched", context.year, report.fetched);
    }
    report
}

/// Rate every team and sort by rating, highest first. Equal ratings keep
/// manager order.
pub fn rank(season: &Season) -> Vec<Standing<'_>> {
    let (rules, context) = season.parts();
    let mut rated: Vec<(&Team, TeamRating)> = season
        .teams()
        .iter()
        .map(|team| (team, team.rating(rules, context)))
        .collect();

    rated.sort_by(|a, b| b.1.rating.total_cmp(&a.1.rating));

    rated
        .into_iter()
        .enumerate()
        .map(|(i, (team, rating))| Standing {
            rank: i + 1,
            team,
            rating,
        })
        .collect()
}

/// Refresh all stats, wait for the whole batch, then rank.
pub async fn compute_standings<'a>(
    season: &'a mut Season,
    provider: &dyn StatsProvider,
    limit: usize,
) -> (Vec<Standing<'a>>, RefreshReport) {
    let report = refresh_season(season, provider, limit).await;
    let season: &'a Season = season;
    (rank(season), report)
}
