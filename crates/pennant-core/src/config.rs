// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// American League.
pub const DEFAULT_LEAGUE_ID: u32 = 103;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;
pub const DEFAULT_STATS_API_URL: &str = "https://statsapi.mlb.com/api/v1";

fn default_league_id() -> u32 {
    DEFAULT_LEAGUE_ID
}

fn default_rosters_dir() -> String {
    "rosters".to_string()
}

fn default_player_map() -> String {
    "data/player_id_map.csv".to_string()
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

fn default_stats_api_url() -> String {
    DEFAULT_STATS_API_URL.to_string()
}

fn default_rating_precision() -> usize {
    1
}

fn default_max_minors() -> usize {
    5
}

fn default_injury_efficacy() -> f64 {
    0.7
}

fn default_minors_penalty() -> f64 {
    0.9
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    seasons: Vec<SeasonConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    #[serde(default = "default_league_id")]
    pub league_id: u32,
    /// Directory holding `<year>/<manager>.toml` roster documents.
    #[serde(default = "default_rosters_dir")]
    pub rosters_dir: String,
    /// CSV mapping MLB ids to display names.
    #[serde(default = "default_player_map")]
    pub player_map: String,
    /// Upper bound on in-flight stat fetches during a standings refresh.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    #[serde(default = "default_stats_api_url")]
    pub stats_api_url: String,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            league_id: default_league_id(),
            rosters_dir: default_rosters_dir(),
            player_map: default_player_map(),
            fetch_concurrency: default_fetch_concurrency(),
            stats_api_url: default_stats_api_url(),
        }
    }
}

/// One season's managers and rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonConfig {
    pub year: i32,
    /// Overrides `league.league_id` for this season.
    #[serde(default)]
    pub league_id: Option<u32>,
    pub managers: Vec<String>,
    /// Decimal places shown for team ratings. Bump it when standings are tight.
    #[serde(default = "default_rating_precision")]
    pub rating_precision: usize,
    pub rules: Rules,
}

/// Per-season league rules. Every constant used by the valuation and rating
/// formulas lives here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rules {
    pub num_reserve_hitters: usize,
    pub num_pitchers: usize,
    pub team_innings_threshold: f64,
    pub innings_deficit_multiplier: f64,
    pub innings_surplus_multiplier: f64,
    pub injured_pitcher_innings_multiplier: f64,
    pub injured_pitcher_era_multiplier: f64,
    #[serde(default = "default_max_minors")]
    pub max_minors: usize,
    /// Optional cap on pitchers stashed in the minors. Unset means no cap.
    #[serde(default)]
    pub max_minors_pitchers: Option<usize>,
    /// Fraction of prior-year production credited to a player coming back
    /// from injury, before scaling by season progress.
    #[serde(default = "default_injury_efficacy")]
    pub injury_efficacy: f64,
    /// Extra discount for players demoted to the minors.
    #[serde(default = "default_minors_penalty")]
    pub minors_penalty: f64,
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub seasons: Vec<SeasonConfig>,
}

impl Config {
    /// Look up a configured season by year.
    pub fn season(&self, year: i32) -> Option<&SeasonConfig> {
        self.seasons.iter().find(|s| s.year == year)
    }

    /// The most recent configured season.
    pub fn current_season(&self) -> Option<&SeasonConfig> {
        self.seasons.iter().max_by_key(|s| s.year)
    }

    /// League id for a season, falling back to the league-wide default.
    pub fn league_id_for(&self, season: &SeasonConfig) -> u32 {
        season.league_id.unwrap_or(self.league.league_id)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("league.toml");
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

/// Parse and validate league.toml contents. `path` is only used in errors.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: LeagueFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        seasons: file.seasons,
    };

    validate(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.fetch_concurrency == 0 {
        return Err(invalid("league.fetch_concurrency", "must be greater than 0"));
    }

    if config.seasons.is_empty() {
        return Err(invalid("seasons", "at least one season must be configured"));
    }

    let mut years = HashSet::new();
    for season in &config.seasons {
        let prefix = format!("seasons[{}]", season.year);

        if !years.insert(season.year) {
            return Err(invalid(prefix, "duplicate season year"));
        }

        if season.managers.is_empty() {
            return Err(invalid(format!("{prefix}.managers"), "must not be empty"));
        }

        let mut seen = HashSet::new();
        for manager in &season.managers {
            if manager.trim().is_empty() {
                return Err(invalid(
                    format!("{prefix}.managers"),
                    "manager names must not be blank",
                ));
            }
            if !seen.insert(manager.to_lowercase()) {
                return Err(invalid(
                    format!("{prefix}.managers"),
                    format!("duplicate manager `{manager}`"),
                ));
            }
        }

        validate_rules(&season.rules, &prefix)?;
    }

    Ok(())
}

fn validate_rules(rules: &Rules, prefix: &str) -> Result<(), ConfigError> {
    if rules.num_pitchers == 0 {
        return Err(invalid(
            format!("{prefix}.rules.num_pitchers"),
            "must be greater than 0",
        ));
    }

    let non_negative: &[(&str, f64)] = &[
        ("team_innings_threshold", rules.team_innings_threshold),
        ("innings_deficit_multiplier", rules.innings_deficit_multiplier),
        ("innings_surplus_multiplier", rules.innings_surplus_multiplier),
        (
            "injured_pitcher_innings_multiplier",
            rules.injured_pitcher_innings_multiplier,
        ),
        (
            "injured_pitcher_era_multiplier",
            rules.injured_pitcher_era_multiplier,
        ),
    ];
    for (name, val) in non_negative {
        if !val.is_finite() || *val < 0.0 {
            return Err(invalid(
                format!("{prefix}.rules.{name}"),
                format!("must be a finite, non-negative number, got {val}"),
            ));
        }
    }

    let fractions: &[(&str, f64)] = &[
        ("injury_efficacy", rules.injury_efficacy),
        ("minors_penalty", rules.minors_penalty),
    ];
    for (name, val) in fractions {
        if !(*val > 0.0 && *val <= 1.0) {
            return Err(invalid(
                format!("{prefix}.rules.{name}"),
                format!("must be in (0, 1], got {val}"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[league]
league_id = 103

[[seasons]]
year = 2021
managers = ["Andrew", "Evans", "Jeff"]
[seasons.rules]
num_reserve_hitters = 5
num_pitchers = 8
team_innings_threshold = 1000
innings_deficit_multiplier = 0.3333333333
innings_surplus_multiplier = 0.2
injured_pitcher_innings_multiplier = 0.8
injured_pitcher_era_multiplier = 1.3

[[seasons]]
year = 2022
managers = ["Andrew", "Evans", "Jeff", "Ron"]
rating_precision = 2
[seasons.rules]
num_reserve_hitters = 4
num_pitchers = 7
team_innings_threshold = 900
innings_deficit_multiplier = 0.3333333333
innings_surplus_multiplier = 0.0
injured_pitcher_innings_multiplier = 0.7
injured_pitcher_era_multiplier = 1.15
max_minors_pitchers = 3
"#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        parse_config(text, Path::new("config/league.toml"))
    }

    #[test]
    fn parses_sample_config() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.league.league_id, 103);
        assert_eq!(config.league.rosters_dir, "rosters");
        assert_eq!(config.league.fetch_concurrency, DEFAULT_FETCH_CONCURRENCY);
        assert_eq!(config.seasons.len(), 2);

        let s2021 = config.season(2021).unwrap();
        assert_eq!(s2021.rules.num_pitchers, 8);
        assert_eq!(s2021.rules.max_minors, 5);
        assert_eq!(s2021.rules.max_minors_pitchers, None);
        assert_eq!(s2021.rating_precision, 1);
        assert!((s2021.rules.injury_efficacy - 0.7).abs() < 1e-12);
        assert!((s2021.rules.minors_penalty - 0.9).abs() < 1e-12);

        let s2022 = config.season(2022).unwrap();
        assert_eq!(s2022.rules.max_minors_pitchers, Some(3));
        assert_eq!(s2022.rating_precision, 2);
    }

    #[test]
    fn current_season_is_latest_year() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.current_season().unwrap().year, 2022);
    }

    #[test]
    fn season_league_id_falls_back_to_league() {
        let config = parse(SAMPLE).unwrap();
        let season = config.season(2022).unwrap();
        assert_eq!(config.league_id_for(season), 103);
    }

    #[test]
    fn missing_seasons_rejected() {
        let err = parse("[league]\nleague_id = 104\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "seasons"));
    }

    #[test]
    fn duplicate_manager_rejected() {
        let text = SAMPLE.replace(r#"["Andrew", "Evans", "Jeff"]"#, r#"["Andrew", "andrew"]"#);
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate manager"));
    }

    #[test]
    fn duplicate_year_rejected() {
        let text = SAMPLE.replace("year = 2022", "year = 2021");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate season year"));
    }

    #[test]
    fn negative_multiplier_rejected() {
        let text = SAMPLE.replace(
            "innings_surplus_multiplier = 0.2",
            "innings_surplus_multiplier = -0.2",
        );
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("innings_surplus_multiplier"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse("[league\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = load_config_from(Path::new("/nonexistent/pennant")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
