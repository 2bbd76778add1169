// HTTP client for the public MLB Stats API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use pennant_core::config::DEFAULT_STATS_API_URL;
use pennant_core::provider::{
    DivisionStandings, PlayerStatsResponse, ProviderError, StandingsProvider, StatGroup,
    StatsProvider,
};

use crate::parse::{parse_player_stats, parse_standings};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

// ---------------------------------------------------------------------------
// MlbStatsClient
// ---------------------------------------------------------------------------

/// Stats and standings over `https://statsapi.mlb.com/api/v1`.
#[derive(Debug, Clone)]
pub struct MlbStatsClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for MlbStatsClient {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_API_URL)
    }
}

impl MlbStatsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub(crate) fn player_url(&self, player_id: u32, group: StatGroup) -> String {
        format!(
            "{}/people/{player_id}?hydrate=currentTeam,stats(group=[{group}],type=[yearByYear])",
            self.base_url
        )
    }

    pub(crate) fn standings_url(&self, league_id: u32, year: i32) -> String {
        format!(
            "{}/standings?leagueId={league_id}&season={year}&standingsTypes=regularSeason",
            self.base_url
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| ProviderError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl StatsProvider for MlbStatsClient {
    async fn player_stats(
        &self,
        player_id: u32,
        group: StatGroup,
    ) -> Result<PlayerStatsResponse, ProviderError> {
        let url = self.player_url(player_id, group);
        let body = self.get_json(&url).await?;
        parse_player_stats(&body).map_err(|message| ProviderError::Decode { url, message })
    }
}

#[async_trait]
impl StandingsProvider for MlbStatsClient {
    async fn standings(
        &self,
        league_id: u32,
        year: i32,
    ) -> Result<Vec<DivisionStandings>, ProviderError> {
        let url = self.standings_url(league_id, year);
        let body = self.get_json(&url).await?;
        parse_standings(&body).map_err(|message| ProviderError::Decode { url, message })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one HTTP response, returning the request line that was received.
    async fn serve_once(status_line: &'static str, body: String) -> (SocketAddr, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();

            request.lines().next().unwrap_or_default().to_string()
        });

        (addr, handle)
    }

    #[test]
    fn urls_include_group_and_league() {
        let client = MlbStatsClient::new("https://example.test/api/v1/");
        assert_eq!(
            client.player_url(660271, StatGroup::Pitching),
            "https://example.test/api/v1/people/660271?hydrate=currentTeam,stats(group=[pitching],type=[yearByYear])"
        );
        assert_eq!(
            client.standings_url(103, 2024),
            "https://example.test/api/v1/standings?leagueId=103&season=2024&standingsTypes=regularSeason"
        );
    }

    #[tokio::test]
    async fn player_stats_from_mock_server() {
        let body = r#"{"people":[{"id":1,"currentTeam":{"name":"Boston Red Sox"},"stats":[{"splits":[{"season":"2024","stat":{"gamesPlayed":12,"homeRuns":4}}]}]}]}"#;
        let (addr, server) = serve_once("200 OK", body.to_string()).await;
        let client = MlbStatsClient::new(format!("http://{addr}"));

        let resp = client.player_stats(1, StatGroup::Hitting).await.unwrap();
        let request_line = server.await.unwrap();

        assert!(request_line.starts_with("GET /people/1?hydrate=currentTeam"), "{request_line}");
        assert_eq!(resp.current_team.as_deref(), Some("Boston Red Sox"));
        assert_eq!(resp.stats_by_year[0].stats.get("homeRuns"), Some(&4.0));
    }

    #[tokio::test]
    async fn standings_from_mock_server() {
        let body = r#"{"records":[{"division":{"id":200},"teamRecords":[{"wins":10,"losses":5},{"wins":7,"losses":8}]}]}"#;
        let (addr, server) = serve_once("200 OK", body.to_string()).await;
        let client = MlbStatsClient::new(format!("http://{addr}"));

        let divisions = client.standings(103, 2024).await.unwrap();
        let request_line = server.await.unwrap();

        assert!(request_line.contains("leagueId=103"));
        assert!(request_line.contains("season=2024"));
        assert_eq!(divisions[0].teams.len(), 2);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (addr, _server) = serve_once("503 Service Unavailable", "{}".to_string()).await;
        let client = MlbStatsClient::new(format!("http://{addr}"));

        let err = client.standings(103, 2024).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 503, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (addr, _server) = serve_once("200 OK", "not json".to_string()).await;
        let client = MlbStatsClient::new(format!("http://{addr}"));

        let err = client.player_stats(5, StatGroup::Hitting).await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = MlbStatsClient::new(format!("http://{addr}"));
        let err = client.player_stats(5, StatGroup::Hitting).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }), "{err:?}");
    }
}
