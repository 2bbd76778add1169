// Season progress from league standings, cached per (league, year).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::model::season::SeasonContext;
use crate::provider::{DivisionStandings, ProviderError, StandingsProvider};

/// How long a computed average stays fresh.
pub const PROGRESS_TTL: Duration = Duration::from_secs(10_800);

/// Mean games played (wins + losses) across every team in every division.
/// 0 when there are no teams.
pub fn average_games(divisions: &[DivisionStandings]) -> f64 {
    let mut teams = 0u32;
    let mut games = 0u64;
    for team in divisions.iter().flat_map(|d| &d.teams) {
        teams += 1;
        games += u64::from(team.wins) + u64::from(team.losses);
    }
    if teams == 0 {
        0.0
    } else {
        games as f64 / f64::from(teams)
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: f64,
    expires_at: Instant,
}

type Slot = Arc<RwLock<Option<CacheEntry>>>;

/// Caches league-wide average games played with a TTL.
///
/// Each (league, year) key has its own slot. Fresh reads share a read lock;
/// a stale or empty slot is refreshed under the write lock, and callers that
/// queued behind the refresher re-check and reuse its value, so one expiry
/// costs one upstream request.
pub struct ProgressTracker {
    provider: Arc<dyn StandingsProvider>,
    ttl: Duration,
    slots: Mutex<HashMap<(u32, i32), Slot>>,
}

impl ProgressTracker {
    pub fn new(provider: Arc<dyn StandingsProvider>) -> Self {
        Self::with_ttl(provider, PROGRESS_TTL)
    }

    pub fn with_ttl(provider: Arc<dyn StandingsProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, league_id: u32, year: i32) -> Slot {
        let mut slots = match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(slots.entry((league_id, year)).or_default())
    }

    /// Average games played so far for a league and season.
    ///
    /// A failed refresh is returned to the caller and leaves the slot as it
    /// was, so the next call retries.
    pub async fn average_games_played(&self, league_id: u32, year: i32) -> Result<f64, ProviderError> {
        let slot = self.slot(league_id, year);

        if let Some(entry) = *slot.read().await {
            if Instant::now() < entry.expires_at {
                return Ok(entry.value);
            }
        }

        let mut guard = slot.write().await;
        if let Some(entry) = *guard {
            if Instant::now() < entry.expires_at {
                debug!(league_id, year, "progress refreshed by another caller");
                return Ok(entry.value);
            }
        }

        let divisions = self.provider.standings(league_id, year).await?;
        let value = average_games(&divisions);
        info!("Computed average games played for league {league_id} in {year}: {value:.2}");

        *guard = Some(CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        });
        Ok(value)
    }

    /// Fraction of the season played, `average_games_played / 162`.
    pub async fn progress(&self, league_id: u32, year: i32) -> Result<f64, ProviderError> {
        Ok(self.context(league_id, year).await?.progress())
    }

    /// Season context for valuation and rating.
    pub async fn context(&self, league_id: u32, year: i32) -> Result<SeasonContext, ProviderError> {
        let average = self.average_games_played(league_id, year).await?;
        Ok(SeasonContext::new(year, average))
    }
}
