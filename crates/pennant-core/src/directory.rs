// Player display names keyed by MLB id, and club name abbreviations.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Players missing from the published id map.
const MANUAL_NAMES: &[(u32, &str)] = &[(681343, "Shane Smith")];

/// Id-map CSV row. Only the two columns we need; the rest are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawIdMapRow {
    #[serde(default)]
    MLBID: Option<u32>,
    #[serde(default)]
    MLBNAME: String,
}

/// MLB id → display name.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    names: HashMap<u32, String>,
}

impl PlayerDirectory {
    pub fn from_names(names: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Load from an id-map CSV with `MLBID` and `MLBNAME` columns.
    pub fn load_csv(path: &Path) -> Result<Self, DirectoryError> {
        let path_str = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| DirectoryError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        Self::from_reader(file, &path_str)
    }

    /// Parse id-map CSV data. Rows without an MLB id or name are skipped.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, DirectoryError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut names = HashMap::new();
        let mut skipped = 0usize;

        for result in rdr.deserialize::<RawIdMapRow>() {
            let row = result.map_err(|e| DirectoryError::Csv {
                path: source_name.to_string(),
                source: e,
            })?;
            match row.MLBID {
                Some(id) if !row.MLBNAME.trim().is_empty() => {
                    names.insert(id, row.MLBNAME.trim().to_string());
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("{source_name}: skipped {skipped} rows without an MLB id or name");
        }

        let mut directory = Self { names };
        directory.apply_manual_names();
        Ok(directory)
    }

    fn apply_manual_names(&mut self) {
        for (id, name) in MANUAL_NAMES {
            self.names.insert(*id, (*name).to_string());
        }
    }

    /// Display name for an id, or `#<id>` when unknown.
    pub fn name(&self, mlb_id: u32) -> String {
        self.names
            .get(&mlb_id)
            .cloned()
            .unwrap_or_else(|| format!("#{mlb_id}"))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Club abbreviations
// ---------------------------------------------------------------------------

const TEAM_ABBREVIATIONS: &[(&str, &str)] = &[
    ("New York Yankees", "NYY"),
    ("Boston Red Sox", "BOS"),
    ("Tampa Bay Rays", "TB"),
    ("Toronto Blue Jays", "TOR"),
    ("Baltimore Orioles", "BAL"),
    ("Cleveland Guardians", "CLE"),
    ("Cleveland Indians", "CLE"),
    ("Detroit Tigers", "DET"),
    ("Minnesota Twins", "MIN"),
    ("Chicago White Sox", "CWS"),
    ("Kansas City Royals", "KC"),
    ("Texas Rangers", "TEX"),
    ("Houston Astros", "HOU"),
    ("Seattle Mariners", "SEA"),
    ("Oakland Athletics", "OAK"),
    ("Athletics", "ATH"),
    ("Los Angeles Angels", "LAA"),
    ("New York Mets", "NYM"),
    ("Atlanta Braves", "ATL"),
    ("Philadelphia Phillies", "PHI"),
    ("Washington Nationals", "WSH"),
    ("Miami Marlins", "MIA"),
    ("Milwaukee Brewers", "MIL"),
    ("Chicago Cubs", "CHC"),
    ("St. Louis Cardinals", "STL"),
    ("Cincinnati Reds", "CIN"),
    ("Pittsburgh Pirates", "PIT"),
    ("San Francisco Giants", "SFG"),
    ("San Diego Padres", "SD"),
    ("Los Angeles Dodgers", "LAD"),
    ("Colorado Rockies", "COL"),
    ("Arizona Diamondbacks", "ARI"),
];

/// Abbreviation for a full club name; unknown names pass through unchanged.
pub fn team_abbreviation(full_name: &str) -> String {
    TEAM_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, abbr)| (*abbr).to_string())
        .unwrap_or_else(|| full_name.to_string())
}
