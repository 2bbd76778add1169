// Integration tests for the rating pipeline.
//
// These drive the public API end to end: league.toml and roster documents on
// disk, progress from a standings provider, a concurrent stats refresh, and
// the final ranking.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use pennant_core::config::load_config_from;
use pennant_core::directory::PlayerDirectory;
use pennant_core::model::player::{AT_BATS, EARNED_RUNS, HITS, HOME_RUNS, OUTS, RUNS, WINS};
use pennant_core::model::Season;
use pennant_core::progress::ProgressTracker;
use pennant_core::provider::{
    DivisionStandings, PlayerStatsResponse, ProviderError, StandingsProvider, StatGroup,
    StatsProvider, TeamRecord, YearStats,
};
use pennant_core::standings::compute_standings;

// ===========================================================================
// Test helpers
// ===========================================================================

const LEAGUE_TOML: &str = r#"
[league]
league_id = 103
rosters_dir = "rosters"
fetch_concurrency = 4

[[seasons]]
year = 2024
managers = ["Alice", "Bob", "Carol", "Dave"]
rating_precision = 2

[seasons.rules]
num_reserve_hitters = 1
num_pitchers = 2
team_innings_threshold = 900
innings_deficit_multiplier = 0.3333333
innings_surplus_multiplier = 0.0
injured_pitcher_innings_multiplier = 0.7
injured_pitcher_era_multiplier = 1.15
"#;

/// A valid roster whose ids start at `base`: hitters base+1..=base+10,
/// pitchers base+11 and base+12.
fn roster(base: u32) -> String {
    format!(
        r#"
bench = [{{ mlb_id = {bench}, pos = "OF" }}]
rotation = [{p1}, {{ mlb_id = {p2}, injury_move = true }}]
minors = [{{ mlb_id = {m}, pos = "SS", minors_penalty = true }}]

[starters]
1B = {}
2B = {}
SS = {}
3B = {}
C = {}
DH = {}
OF = [{}, {}, {}]
"#,
        base + 1,
        base + 2,
        base + 3,
        base + 4,
        base + 5,
        base + 6,
        base + 7,
        base + 8,
        base + 9,
        bench = base + 10,
        p1 = base + 11,
        p2 = base + 12,
        m = base + 13,
    )
}

fn setup(name: &str) -> PathBuf {
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("config")).unwrap();
    fs::create_dir_all(tmp.join("rosters").join("2024")).unwrap();
    fs::write(tmp.join("config").join("league.toml"), LEAGUE_TOML).unwrap();

    let rosters = tmp.join("rosters").join("2024");
    fs::write(rosters.join("alice.toml"), roster(1000)).unwrap();
    fs::write(rosters.join("bob.toml"), roster(2000)).unwrap();
    // Carol has no roster file; Dave's rotation is one pitcher short.
    let short = roster(4000).replace(&format!(", {{ mlb_id = {}, injury_move = true }}", 4012), "");
    fs::write(rosters.join("dave.toml"), short).unwrap();
    tmp
}

/// Every team is 81-81, so progress is exactly one half.
struct HalfwayStandings;

#[async_trait]
impl StandingsProvider for HalfwayStandings {
    async fn standings(
        &self,
        _league_id: u32,
        _year: i32,
    ) -> Result<Vec<DivisionStandings>, ProviderError> {
        Ok(vec![DivisionStandings {
            name: "West".into(),
            teams: vec![TeamRecord { wins: 40, losses: 41 }; 5],
        }])
    }
}

/// No games played yet.
struct OpeningDayStandings;

#[async_trait]
impl StandingsProvider for OpeningDayStandings {
    async fn standings(
        &self,
        _league_id: u32,
        _year: i32,
    ) -> Result<Vec<DivisionStandings>, ProviderError> {
        Ok(vec![DivisionStandings {
            name: "West".into(),
            teams: vec![TeamRecord { wins: 0, losses: 0 }; 5],
        }])
    }
}

/// Hitters on the 2000-block roster hit twice as many home runs as the
/// 1000-block; every pitcher throws the same line in every year.
struct ScriptedStats;

#[async_trait]
impl StatsProvider for ScriptedStats {
    async fn player_stats(
        &self,
        player_id: u32,
        group: StatGroup,
    ) -> Result<PlayerStatsResponse, ProviderError> {
        let block = f64::from(player_id / 1000);
        let stats: HashMap<String, f64> = match group {
            StatGroup::Hitting => HashMap::from([
                (AT_BATS.to_string(), 200.0),
                (HITS.to_string(), 50.0),
                (HOME_RUNS.to_string(), 4.0 * block),
                (RUNS.to_string(), 20.0),
            ]),
            StatGroup::Pitching => HashMap::from([
                (OUTS.to_string(), 300.0),
                (EARNED_RUNS.to_string(), 40.0),
                (WINS.to_string(), 6.0),
            ]),
        };
        let stint = |year| YearStats {
            year,
            games_played: 60,
            stats: stats.clone(),
        };
        Ok(PlayerStatsResponse {
            current_team: Some("Texas Rangers".into()),
            stats_by_year: vec![stint(2023), stint(2024)],
        })
    }
}

fn directory() -> PlayerDirectory {
    PlayerDirectory::from_names([(1001, "Alice First Base".to_string())])
}

async fn load(tmp: &Path) -> Season {
    load_with(tmp, Arc::new(HalfwayStandings)).await
}

async fn load_with(tmp: &Path, standings: Arc<dyn StandingsProvider>) -> Season {
    let config = load_config_from(tmp).unwrap();
    let season_cfg = config.season(2024).unwrap();
    let league_id = config.league_id_for(season_cfg);

    let tracker = ProgressTracker::new(standings);
    let context = tracker.context(league_id, 2024).await.unwrap();

    Season::load(
        season_cfg,
        league_id,
        context,
        &tmp.join(&config.league.rosters_dir),
        &directory(),
    )
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn bad_rosters_are_skipped_and_the_rest_load() {
    let tmp = setup("pennant_pipeline_skips");
    let season = load(&tmp).await;

    let loaded: Vec<&str> = season.teams().iter().map(|t| t.manager.as_str()).collect();
    assert_eq!(loaded, vec!["Alice", "Bob"]);

    let skipped: Vec<&str> = season.skipped().iter().map(|s| s.manager.as_str()).collect();
    assert_eq!(skipped, vec!["Carol", "Dave"]);
    assert!(season.skipped()[1].reason.contains("rotation size"));
    assert!((season.progress() - 0.5).abs() < 1e-12);
}

#[tokio::test]
async fn standings_rank_the_stronger_offense_first() {
    let tmp = setup("pennant_pipeline_rank");
    let mut season = load(&tmp).await;

    let (standings, report) = compute_standings(&mut season, &ScriptedStats, 4).await;

    // 13 players on each of two teams.
    assert_eq!(report.fetched, 26);
    assert_eq!(report.failed, 0);
    assert_eq!(standings[0].team.manager, "Bob");
    assert_eq!(standings[1].team.manager, "Alice");
    assert!(standings[0].rating.offense > standings[1].rating.offense);
    assert_eq!(standings[0].rating.pitching, standings[1].rating.pitching);
}

#[tokio::test]
async fn valuation_flags_flow_through_to_players() {
    let tmp = setup("pennant_pipeline_flags");
    let mut season = load(&tmp).await;
    compute_standings(&mut season, &ScriptedStats, 4).await;

    let alice = season.team("alice").unwrap();
    assert_eq!(alice.starters[0].info.name, "Alice First Base");
    assert_eq!(alice.starters[1].info.name, "#1002");
    assert_eq!(alice.starters[0].info.team, "TEX");

    // Injury move at progress 0.5: 0.7 * 0.5 of last year's line, then the
    // off-year innings and ERA adjustments.
    let injured = &alice.rotation[1];
    assert_eq!(injured.info.stats_year, 2023);
    assert!((injured.info.multiplier - 0.35).abs() < 1e-12);
    assert_eq!(injured.info.notes(), "35% of 2023");

    // Minors penalty alone.
    let minor = &alice.minors_hitters[0];
    assert!((minor.info.multiplier - 0.9).abs() < 1e-12);
    assert!((minor.hr() - 3.6).abs() < 1e-9);
}

#[tokio::test]
async fn opening_day_still_rates_every_valid_team() {
    let tmp = setup("pennant_pipeline_opening_day");
    let mut season = load_with(&tmp, Arc::new(OpeningDayStandings)).await;
    assert_eq!(season.progress(), 0.0);

    let skipped: Vec<&str> = season.skipped().iter().map(|s| s.manager.as_str()).collect();
    assert_eq!(skipped, vec!["Carol", "Dave"]);

    let (standings, report) = compute_standings(&mut season, &ScriptedStats, 4).await;
    assert_eq!(standings.len(), 2);
    assert_eq!(report.fetched, 26);
    assert!(standings.iter().all(|s| s.rating.rating.is_finite()));

    // The injury return is on the roster but contributes nothing yet.
    let injured = &season.team("alice").unwrap().rotation[1];
    assert_eq!(injured.info.multiplier, 0.0);
    assert_eq!(injured.ip(), 0.0);
    assert_eq!(injured.er(), 0.0);
    assert_eq!(injured.wins(), 0.0);
}
