// Roster documents: TOML schema, entry resolution and structural validation.
//
// A roster file lives at `<rosters_dir>/<year>/<manager>.toml`:
//
//     rotation = [669203, { mlb_id = 543037, injury_move = true }]
//     bench = [{ mlb_id = 663728, pos = "C" }, { mlb_id = 641313, pos = "OF (2023)" }]
//     minors = [{ mlb_id = 682985, pos = "P" }]
//
//     [starters]
//     1B = 518692
//     OF = [592450, 660271, { mlb_id = 605141, minors_penalty = true }]
//     ...

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::Rules;
use crate::model::position::Position;

/// Starters per lineup.
pub const NUM_STARTERS: usize = 9;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster file not found: {path}")]
    Missing { path: PathBuf },

    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse roster file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("roster validation failed ({rule}): {detail}")]
    Validation { rule: &'static str, detail: String },

    #[error("unknown position `{0}`")]
    UnknownPosition(String),

    #[error("player {mlb_id} has no position")]
    MissingPosition { mlb_id: u32 },

    #[error("invalid position for player {mlb_id}: {message}")]
    InvalidPosition { mlb_id: u32, message: String },

    #[error("player {mlb_id} has multiplier {multiplier}, expected a value in [0, 1]")]
    InvalidMultiplier { mlb_id: u32, multiplier: f64 },
}

fn violation(rule: &'static str, detail: impl Into<String>) -> RosterError {
    RosterError::Validation {
        rule,
        detail: detail.into(),
    }
}

// ---------------------------------------------------------------------------
// Document schema
// ---------------------------------------------------------------------------

/// A roster slot: either a bare MLB id or a table with flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    Id(u32),
    Detailed(DetailedEntry),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetailedEntry {
    pub mlb_id: u32,
    /// Position, optionally followed by a stats year: `"OF"`, `"2B (2023)"`.
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub injury_move: bool,
    #[serde(default)]
    pub minors_penalty: bool,
    /// Explicit stats year, equivalent to a `(YYYY)` suffix on `pos`.
    #[serde(default)]
    pub year: Option<i32>,
}

/// A starting position holds one player, except OF which holds three.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StarterSpec {
    One(EntrySpec),
    Many(Vec<EntrySpec>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RosterSpec {
    pub starters: BTreeMap<String, StarterSpec>,
    #[serde(default)]
    pub bench: Vec<EntrySpec>,
    #[serde(default)]
    pub rotation: Vec<EntrySpec>,
    #[serde(default)]
    pub minors: Vec<EntrySpec>,
}

// ---------------------------------------------------------------------------
// Resolved entries
// ---------------------------------------------------------------------------

/// One roster slot with its position and valuation flags resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub mlb_id: u32,
    pub position: Position,
    pub injury_move: bool,
    pub minors_penalty: bool,
    /// Explicit stats year from the roster document, if any.
    pub stats_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoster {
    pub starters: Vec<RosterEntry>,
    pub bench: Vec<RosterEntry>,
    pub rotation: Vec<RosterEntry>,
    pub minors: Vec<RosterEntry>,
}

/// Split `"OF (2023)"` into the position and the year suffix.
pub fn parse_position(s: &str) -> Result<(Position, Option<i32>), RosterError> {
    let trimmed = s.trim();
    let (pos_str, year) = match trimmed.split_once('(') {
        Some((pos, rest)) => {
            let year_str = rest.trim_end().strip_suffix(')').unwrap_or(rest).trim();
            let year = year_str
                .parse::<i32>()
                .ok()
                .filter(|y| (1000..=9999).contains(y))
                .ok_or_else(|| RosterError::UnknownPosition(s.to_string()))?;
            (pos, Some(year))
        }
        None => (trimmed, None),
    };
    let position =
        Position::from_str_pos(pos_str).ok_or_else(|| RosterError::UnknownPosition(s.to_string()))?;
    Ok((position, year))
}

impl EntrySpec {
    pub fn mlb_id(&self) -> u32 {
        match self {
            EntrySpec::Id(id) => *id,
            EntrySpec::Detailed(d) => d.mlb_id,
        }
    }

    /// Resolve against the slot's implied position. An entry's own `pos`
    /// wins when there is no implied one; `pos` is required in that case.
    fn resolve(&self, implied: Option<Position>) -> Result<RosterEntry, RosterError> {
        let detailed = match self {
            EntrySpec::Id(id) => {
                let position = implied.ok_or(RosterError::MissingPosition { mlb_id: *id })?;
                return Ok(RosterEntry {
                    mlb_id: *id,
                    position,
                    injury_move: false,
                    minors_penalty: false,
                    stats_year: None,
                });
            }
            EntrySpec::Detailed(d) => d,
        };

        let (own_position, suffix_year) = match detailed.pos.as_deref() {
            Some(pos) => {
                let (p, y) = parse_position(pos)?;
                (Some(p), y)
            }
            None => (None, None),
        };

        let position = implied
            .or(own_position)
            .ok_or(RosterError::MissingPosition {
                mlb_id: detailed.mlb_id,
            })?;

        Ok(RosterEntry {
            mlb_id: detailed.mlb_id,
            position,
            injury_move: detailed.injury_move,
            minors_penalty: detailed.minors_penalty,
            stats_year: detailed.year.or(suffix_year),
        })
    }
}

impl RosterSpec {
    /// Resolve every slot's position. Starters take their position from the
    /// table key; rotation entries default to P; bench and minors entries
    /// must name a position.
    pub fn resolve(&self) -> Result<ResolvedRoster, RosterError> {
        let mut starters = Vec::new();
        for (key, slot) in &self.starters {
            let position =
                Position::from_str_pos(key).ok_or_else(|| RosterError::UnknownPosition(key.clone()))?;
            match slot {
                StarterSpec::One(entry) => starters.push(entry.resolve(Some(position))?),
                StarterSpec::Many(entries) => {
                    for entry in entries {
                        starters.push(entry.resolve(Some(position))?);
                    }
                }
            }
        }
        starters.sort_by_key(|e| e.position);

        let bench = self
            .bench
            .iter()
            .map(|e| e.resolve(None))
            .collect::<Result<Vec<_>, _>>()?;

        let rotation = self
            .rotation
            .iter()
            .map(|e| match e {
                EntrySpec::Detailed(d) if d.pos.is_some() => e.resolve(None),
                _ => e.resolve(Some(Position::Pitcher)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let minors = self
            .minors
            .iter()
            .map(|e| e.resolve(None))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedRoster {
            starters,
            bench,
            rotation,
            minors,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a roster's structure against the season's rules.
///
/// All group sizes are checked before any group's contents, so a short or
/// overfull list is reported as a size problem rather than a position one.
pub fn validate(roster: &ResolvedRoster, rules: &Rules) -> Result<(), RosterError> {
    if roster.starters.len() != NUM_STARTERS {
        return Err(violation(
            "starter count",
            format!("expected {NUM_STARTERS} starters, found {}", roster.starters.len()),
        ));
    }
    if roster.bench.len() != rules.num_reserve_hitters {
        return Err(violation(
            "bench size",
            format!(
                "expected {} bench hitters, found {}",
                rules.num_reserve_hitters,
                roster.bench.len()
            ),
        ));
    }
    if roster.rotation.len() != rules.num_pitchers {
        return Err(violation(
            "rotation size",
            format!(
                "expected {} pitchers, found {}",
                rules.num_pitchers,
                roster.rotation.len()
            ),
        ));
    }
    if roster.minors.len() > rules.max_minors {
        return Err(violation(
            "minors size",
            format!(
                "at most {} players allowed in the minors, found {}",
                rules.max_minors,
                roster.minors.len()
            ),
        ));
    }

    let mut counts: HashMap<Position, usize> = HashMap::new();
    for entry in &roster.starters {
        *counts.entry(entry.position).or_default() += 1;
    }
    let expected: HashMap<Position, usize> = Position::HITTING
        .iter()
        .map(|p| (*p, p.starter_slots()))
        .collect();
    if counts != expected {
        let mut found: Vec<String> = counts
            .iter()
            .map(|(p, n)| format!("{p}:{n}"))
            .collect();
        found.sort();
        return Err(violation(
            "starter position counts",
            format!(
                "expected one each of 1B/2B/SS/3B/C/DH and three OF, found {}",
                found.join(", ")
            ),
        ));
    }

    if let Some(cap) = rules.max_minors_pitchers {
        let pitchers = roster
            .minors
            .iter()
            .filter(|e| e.position == Position::Pitcher)
            .count();
        if pitchers > cap {
            return Err(violation(
                "minors pitchers",
                format!("at most {cap} pitchers allowed in the minors, found {pitchers}"),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Path of a manager's roster document for a season.
pub fn roster_path(rosters_dir: &Path, year: i32, manager: &str) -> PathBuf {
    rosters_dir
        .join(year.to_string())
        .join(format!("{}.toml", manager.to_lowercase()))
}

pub fn parse_roster(text: &str, path: &Path) -> Result<RosterSpec, RosterError> {
    toml::from_str(text).map_err(|e| RosterError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and parse a manager's roster document.
pub fn load_roster(rosters_dir: &Path, year: i32, manager: &str) -> Result<RosterSpec, RosterError> {
    let path = roster_path(rosters_dir, year, manager);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RosterError::Missing { path });
        }
        Err(e) => return Err(RosterError::Io { path, source: e }),
    };
    parse_roster(&text, &path)
}
