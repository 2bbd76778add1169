// One run of the tool: pick the season, measure progress, load rosters,
// refresh stats and render the requested page.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use tracing::info;

use pennant_core::config::Config;
use pennant_core::directory::PlayerDirectory;
use pennant_core::model::Season;
use pennant_core::progress::ProgressTracker;
use pennant_core::provider::StatsProvider;
use pennant_core::standings::{compute_standings, refresh_team};

use crate::cli::Args;
use crate::report::{render_standings, render_team, PageHeader};

/// External collaborators, built once in `main`.
pub struct Services {
    pub stats: Arc<dyn StatsProvider>,
    pub progress: Arc<ProgressTracker>,
    pub directory: PlayerDirectory,
}

pub async fn run(
    config: &Config,
    base_dir: &Path,
    args: &Args,
    services: &Services,
    now: NaiveDateTime,
) -> anyhow::Result<String> {
    let season_cfg = match args.year {
        Some(year) => config
            .season(year)
            .with_context(|| format!("season {year} is not configured"))?,
        None => config.current_season().context("no seasons configured")?,
    };
    let year = season_cfg.year;
    let league_id = config.league_id_for(season_cfg);

    let context = services
        .progress
        .context(league_id, year)
        .await
        .with_context(|| format!("failed to fetch standings for league {league_id} in {year}"))?;
    info!(
        "Season {year}: {:.1} average games played ({:.1}%)",
        context.average_games_played,
        context.progress() * 100.0
    );

    let rosters_dir = base_dir.join(&config.league.rosters_dir);
    let mut season = Season::load(season_cfg, league_id, context, &rosters_dir, &services.directory);

    let header = PageHeader {
        year,
        progress: season.progress(),
        updated: now,
    };
    let limit = config.league.fetch_concurrency;
    let precision = season.rating_precision;

    match &args.manager {
        Some(manager) => {
            let rules = season.rules.clone();
            let context = season.context;
            let skipped = season
                .skipped()
                .iter()
                .find(|s| s.manager.eq_ignore_ascii_case(manager))
                .map(|s| s.reason.clone());

            let Some(team) = season.team_mut(manager) else {
                match skipped {
                    Some(reason) => bail!("team for {manager} could not be loaded: {reason}"),
                    None => bail!("no manager named {manager} in {year}"),
                }
            };

            let report = refresh_team(team, services.stats.as_ref(), &context, &rules, limit).await;
            let rating = team.rating(&rules, &context);
            Ok(render_team(&header, team, &rating, precision, &report))
        }
        None => {
            let skipped = season.skipped().to_vec();
            let (standings, report) =
                compute_standings(&mut season, services.stats.as_ref(), limit).await;
            Ok(render_standings(&header, &standings, precision, &skipped, &report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use pennant_core::config::load_config_from;
    use pennant_core::model::player::{AT_BATS, EARNED_RUNS, HITS, HOME_RUNS, OUTS};
    use pennant_core::provider::{
        DivisionStandings, PlayerStatsResponse, ProviderError, StandingsProvider, StatGroup,
        TeamRecord, YearStats,
    };
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    const LEAGUE_TOML: &str = r#"
[league]
rosters_dir = "rosters"

[[seasons]]
year = 2023
managers = ["Andrew", "Evans", "Ghost"]

[seasons.rules]
num_reserve_hitters = 0
num_pitchers = 1
team_innings_threshold = 900
innings_deficit_multiplier = 0.3333333
innings_surplus_multiplier = 0.0
injured_pitcher_innings_multiplier = 0.7
injured_pitcher_era_multiplier = 1.15
"#;

    fn roster(base: u32) -> String {
        format!(
            "rotation = [{}]\n[starters]\n1B = {}\n2B = {}\nSS = {}\n3B = {}\nC = {}\nDH = {}\nOF = [{}, {}, {}]\n",
            base + 10,
            base + 1,
            base + 2,
            base + 3,
            base + 4,
            base + 5,
            base + 6,
            base + 7,
            base + 8,
            base + 9,
        )
    }

    fn setup(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::create_dir_all(tmp.join("rosters").join("2023")).unwrap();
        fs::write(tmp.join("config").join("league.toml"), LEAGUE_TOML).unwrap();
        fs::write(tmp.join("rosters/2023/andrew.toml"), roster(100)).unwrap();
        fs::write(tmp.join("rosters/2023/evans.toml"), roster(500)).unwrap();
        tmp
    }

    struct Fixed;

    #[async_trait]
    impl StandingsProvider for Fixed {
        async fn standings(
            &self,
            _league_id: u32,
            _year: i32,
        ) -> Result<Vec<DivisionStandings>, ProviderError> {
            Ok(vec![DivisionStandings {
                name: "West".into(),
                teams: vec![TeamRecord { wins: 60, losses: 48 }],
            }])
        }
    }

    #[async_trait]
    impl StatsProvider for Fixed {
        async fn player_stats(
            &self,
            player_id: u32,
            group: StatGroup,
        ) -> Result<PlayerStatsResponse, ProviderError> {
            let stats = match group {
                StatGroup::Hitting => HashMap::from([
                    (AT_BATS.to_string(), 300.0),
                    (HITS.to_string(), 80.0),
                    (HOME_RUNS.to_string(), f64::from(player_id / 100)),
                ]),
                StatGroup::Pitching => HashMap::from([
                    (OUTS.to_string(), 450.0),
                    (EARNED_RUNS.to_string(), 50.0),
                ]),
            };
            Ok(PlayerStatsResponse {
                current_team: Some("Chicago Cubs".into()),
                stats_by_year: vec![YearStats {
                    year: 2023,
                    games_played: 100,
                    stats,
                }],
            })
        }
    }

    fn services() -> Services {
        Services {
            stats: Arc::new(Fixed),
            progress: Arc::new(ProgressTracker::new(Arc::new(Fixed))),
            directory: PlayerDirectory::default(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 7, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn standings_page_for_latest_season() {
        let tmp = setup("pennant_app_standings");
        let config = load_config_from(&tmp).unwrap();

        let out = run(&config, &tmp, &Args::default(), &services(), now()).await.unwrap();

        assert!(out.starts_with("Standings 2023"));
        assert!(out.contains("(66.7% of season played"));
        let evans = out.find("Evans").unwrap();
        let andrew = out.find("Andrew").unwrap();
        assert!(evans < andrew, "{out}");
        assert!(out.contains("Skipped Ghost: roster file not found"));
    }

    #[tokio::test]
    async fn team_page_is_case_insensitive() {
        let tmp = setup("pennant_app_team");
        let config = load_config_from(&tmp).unwrap();
        let args = Args {
            manager: Some("andrew".into()),
            ..Args::default()
        };

        let out = run(&config, &tmp, &args, &services(), now()).await.unwrap();

        assert!(out.starts_with("Andrew 2023"));
        assert!(out.contains("#101"));
        assert!(out.contains("CHC"));
        assert!(out.contains("150.00"));
    }

    #[tokio::test]
    async fn unknown_season_and_manager_are_errors() {
        let tmp = setup("pennant_app_errors");
        let config = load_config_from(&tmp).unwrap();

        let args = Args {
            year: Some(1999),
            ..Args::default()
        };
        let err = run(&config, &tmp, &args, &services(), now()).await.unwrap_err();
        assert!(err.to_string().contains("season 1999"));

        let args = Args {
            manager: Some("Nobody".into()),
            ..Args::default()
        };
        let err = run(&config, &tmp, &args, &services(), now()).await.unwrap_err();
        assert!(err.to_string().contains("no manager named Nobody"));

        let args = Args {
            manager: Some("ghost".into()),
            ..Args::default()
        };
        let err = run(&config, &tmp, &args, &services(), now()).await.unwrap_err();
        assert!(err.to_string().contains("could not be loaded"));
    }
}
