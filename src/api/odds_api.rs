use crate::api::{ApiGateway, ApiRequest, Resource};
use crate::error::FetchError;
use crate::models::{Market, OddsFormat, OddsOffer, OddsQuote};
use crate::Config;
use serde::Deserialize;
use std::sync::Arc;

/// Response from The Odds API for a single match.
/// Every field defaults so one incomplete event never sinks the whole list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OddsApiEvent {
    home_team: Option<String>,
    away_team: Option<String>,
    // older API versions sent a bare pair instead of home/away
    teams: Option<Vec<String>>,
    bookmakers: Vec<OddsApiBookmaker>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OddsApiBookmaker {
    title: String,
    markets: Vec<OddsApiMarket>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OddsApiMarket {
    key: String,
    outcomes: Vec<OddsApiOutcome>,
}

/// Outcome data for a specific team (or "Draw")
#[derive(Debug, Deserialize)]
struct OddsApiOutcome {
    name: String,
    price: f64,
    #[serde(default)]
    point: Option<f64>,
}

impl OddsApiEvent {
    fn team_pair(&self) -> Option<(String, String)> {
        if let (Some(home), Some(away)) = (&self.home_team, &self.away_team) {
            return Some((home.clone(), away.clone()));
        }
        match self.teams.as_deref() {
            Some([first, second, ..]) => Some((first.clone(), second.clone())),
            _ => None,
        }
    }
}

/// Parameters for one odds request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OddsQuery {
    pub market: Market,
    pub format: OddsFormat,
}

pub struct OddsApiClient {
    gateway: Arc<ApiGateway>,
    base_url: String,
    api_key: String,
    sport: String,
    regions: String,
}

impl OddsApiClient {
    pub fn new(
        gateway: Arc<ApiGateway>,
        base_url: &str,
        api_key: String,
        sport: String,
        regions: String,
    ) -> Self {
        Self {
            gateway,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            sport,
            regions,
        }
    }

    pub fn from_config(gateway: Arc<ApiGateway>, config: &Config) -> Self {
        Self::new(
            gateway,
            &config.odds_api_base_url,
            config.odds_api_key.clone(),
            config.odds_sport.clone(),
            config.odds_regions.clone(),
        )
    }

    /// Fetch quotes for upcoming matches, first bookmaker and first market only
    pub async fn fetch_odds(&self, query: OddsQuery) -> Result<Vec<OddsQuote>, FetchError> {
        let url = format!("{}/sports/{}/odds", self.base_url, self.sport);
        let request = ApiRequest::get(url)
            .query("regions", self.regions.clone())
            .query("markets", query.market.as_str())
            .query("oddsFormat", query.format.as_str())
            .secret_query("apiKey", self.api_key.clone());

        let value = self.gateway.fetch(Resource::Odds, request).await?;
        parse_odds(value)
    }
}

fn parse_odds(value: serde_json::Value) -> Result<Vec<OddsQuote>, FetchError> {
    let events: Vec<serde_json::Value> = serde_json::from_value(value)?;
    let events = events
        .into_iter()
        .filter_map(|event| match serde_json::from_value::<OddsApiEvent>(event) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable odds event");
                None
            }
        });
    Ok(quotes_from_events(events))
}

/// Events missing teams, bookmakers or markets are skipped one by one.
fn quotes_from_events(events: impl IntoIterator<Item = OddsApiEvent>) -> Vec<OddsQuote> {
    events
        .into_iter()
        .filter_map(|event| {
            let (home_team, away_team) = event.team_pair()?;
            let bookmaker = event.bookmakers.into_iter().next()?;
            let market = bookmaker.markets.into_iter().next()?;

            let offers = market
                .outcomes
                .into_iter()
                .map(|outcome| OddsOffer {
                    label: outcome.name,
                    price: outcome.price,
                    point: outcome.point,
                })
                .collect();

            Some(OddsQuote {
                home_team,
                away_team,
                bookmaker: bookmaker.title,
                market: market.key,
                offers,
            })
        })
        .collect()
}
