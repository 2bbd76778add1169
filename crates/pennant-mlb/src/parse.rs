// JSON shapes returned by the Stats API, reduced to pennant-core types.

use std::collections::HashMap;

use serde_json::Value;

use pennant_core::provider::{DivisionStandings, PlayerStatsResponse, TeamRecord, YearStats};

/// Extract year-by-year stats and the current club from a `people` response.
///
/// Expected shape:
/// `{ "people": [ { "currentTeam": { "name": ".." }, "stats": [ { "splits": [ { "season": "2024", "stat": {..} } ] } ] } ] }`
///
/// A person with no `stats` (e.g. no major league time yet) yields an empty
/// list. Non-numeric stat values such as `avg: ".300"` are skipped; rate
/// stats are recomputed from counting stats.
pub fn parse_player_stats(v: &Value) -> Result<PlayerStatsResponse, String> {
    let person = v
        .get("people")
        .and_then(Value::as_array)
        .and_then(|people| people.first())
        .ok_or_else(|| "response has no people".to_string())?;

    let current_team = person
        .get("currentTeam")
        .and_then(|t| t.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let splits = person
        .get("stats")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|group| group.get("splits").and_then(Value::as_array))
        .flatten();

    let stats_by_year = splits.filter_map(parse_split).collect();

    Ok(PlayerStatsResponse {
        current_team,
        stats_by_year,
    })
}

fn parse_split(split: &Value) -> Option<YearStats> {
    let year = match split.get("season")? {
        Value::String(s) => s.parse().ok()?,
        Value::Number(n) => i32::try_from(n.as_i64()?).ok()?,
        _ => return None,
    };
    let stat = split.get("stat")?.as_object()?;

    let games_played = stat
        .get("gamesPlayed")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    let stats: HashMap<String, f64> = stat
        .iter()
        .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
        .collect();

    Some(YearStats {
        year,
        games_played,
        stats,
    })
}

/// Extract win/loss records from a `standings` response.
///
/// Expected shape:
/// `{ "records": [ { "division": { "id": 200, "name": ".." }, "teamRecords": [ { "wins": 50, "losses": 30 } ] } ] }`
pub fn parse_standings(v: &Value) -> Result<Vec<DivisionStandings>, String> {
    let records = v
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| "response has no records".to_string())?;

    Ok(records.iter().map(parse_division).collect())
}

fn parse_division(record: &Value) -> DivisionStandings {
    let division = record.get("division");
    let name = division
        .and_then(|d| d.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| division.and_then(|d| d.get("id")).map(|id| id.to_string()))
        .unwrap_or_default();

    let teams = record
        .get("teamRecords")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|team| TeamRecord {
            wins: count(team, "wins"),
            losses: count(team, "losses"),
        })
        .collect();

    DivisionStandings { name, teams }
}

fn count(v: &Value, key: &str) -> u32 {
    v.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}
