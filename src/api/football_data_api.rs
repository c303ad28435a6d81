use crate::api::{ApiGateway, ApiRequest, Resource};
use crate::error::FetchError;
use crate::models::{MatchRecord, StandingsRow};
use crate::Config;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    matches: Vec<ApiMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMatch {
    utc_date: DateTime<Utc>,
    home_team: ApiTeam,
    away_team: ApiTeam,
    score: ApiScore,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    // null for knockout fixtures whose participants are not decided yet
    name: Option<String>,
}

impl ApiTeam {
    fn into_name(self) -> String {
        self.name.unwrap_or_else(|| "TBD".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiScore {
    full_time: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiGoals {
    home: Option<u32>,
    away: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    #[serde(default)]
    standings: Vec<ApiStanding>,
}

#[derive(Debug, Deserialize)]
struct ApiStanding {
    table: Vec<ApiTableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTableRow {
    position: u32,
    team: ApiTeam,
    played_games: u32,
    won: u32,
    draw: u32,
    lost: u32,
    goals_for: u32,
    goals_against: u32,
    points: i32,
}

/// Client for the football-data.org v4 API (matches, fixtures, standings)
pub struct FootballDataClient {
    gateway: Arc<ApiGateway>,
    base_url: String,
    api_key: String,
    competition: String,
}

impl FootballDataClient {
    pub fn new(
        gateway: Arc<ApiGateway>,
        base_url: &str,
        api_key: String,
        competition: String,
    ) -> Self {
        Self {
            gateway,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            competition,
        }
    }

    pub fn from_config(gateway: Arc<ApiGateway>, config: &Config) -> Self {
        Self::new(
            gateway,
            &config.football_data_base_url,
            config.football_api_key.clone(),
            config.competition.clone(),
        )
    }

    fn matches_request(&self) -> ApiRequest {
        ApiRequest::get(format!(
            "{}/competitions/{}/matches",
            self.base_url, self.competition
        ))
        .header(AUTH_HEADER, self.api_key.clone())
    }

    /// Every match of a season in provider order; unplayed ones have no goals.
    pub async fn fetch_season_matches(&self, season: u16) -> Result<Vec<MatchRecord>, FetchError> {
        let request = self.matches_request().query("season", season.to_string());
        let value = self.gateway.fetch(Resource::PlayedMatches, request).await?;
        parse_matches(value)
    }

    /// Upcoming fixtures for the competition
    pub async fn fetch_scheduled_fixtures(&self) -> Result<Vec<MatchRecord>, FetchError> {
        let request = self.matches_request().query("status", "SCHEDULED");
        let value = self
            .gateway
            .fetch(Resource::ScheduledFixtures, request)
            .await?;
        parse_matches(value)
    }

    /// Current league table. An absent or empty `standings` array yields no rows.
    pub async fn fetch_standings(&self) -> Result<Vec<StandingsRow>, FetchError> {
        let request = ApiRequest::get(format!(
            "{}/competitions/{}/standings",
            self.base_url, self.competition
        ))
        .header(AUTH_HEADER, self.api_key.clone());
        let value = self.gateway.fetch(Resource::Standings, request).await?;
        parse_standings(value)
    }
}

fn parse_matches(value: serde_json::Value) -> Result<Vec<MatchRecord>, FetchError> {
    let response: MatchesResponse = serde_json::from_value(value)?;
    Ok(response
        .matches
        .into_iter()
        .map(|m| MatchRecord {
            home_team: m.home_team.into_name(),
            away_team: m.away_team.into_name(),
            home_goals: m.score.full_time.home,
            away_goals: m.score.full_time.away,
            kickoff: m.utc_date,
        })
        .collect())
}

fn parse_standings(value: serde_json::Value) -> Result<Vec<StandingsRow>, FetchError> {
    let response: StandingsResponse = serde_json::from_value(value)?;
    let Some(total) = response.standings.into_iter().next() else {
        return Ok(Vec::new());
    };

    Ok(total
        .table
        .into_iter()
        .map(|row| StandingsRow {
            position: row.position,
            team: row.team.into_name(),
            played: row.played_games,
            won: row.won,
            draw: row.draw,
            lost: row.lost,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            points: row.points,
        })
        .collect())
}
