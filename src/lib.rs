pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod utils;

pub use api::*;
pub use config::Config;
pub use dashboard::{render, DashboardData, DashboardView};
pub use error::{ClassifierError, ConfigError, FetchError};
pub use models::*;
pub use utils::*;

use api::football_data_api::FootballDataClient;
use api::odds_api::{OddsApiClient, OddsQuery};
use std::sync::Arc;

/// Both provider clients sharing one memoizing gateway
pub struct Providers {
    pub football: FootballDataClient,
    pub odds: OddsApiClient,
    pub season: u16,
    pub odds_query: OddsQuery,
    pub display_utc_offset_hours: i32,
}

impl Providers {
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let gateway = api::default_gateway(config)?;
        Ok(Self::with_gateway(gateway, config))
    }

    pub fn with_gateway(gateway: Arc<ApiGateway>, config: &Config) -> Self {
        Self {
            football: FootballDataClient::from_config(gateway.clone(), config),
            odds: OddsApiClient::from_config(gateway, config),
            season: config.season,
            odds_query: OddsQuery {
                market: config.odds_market,
                format: config.odds_format,
            },
            display_utc_offset_hours: config.display_utc_offset_hours,
        }
    }
}

/// Fetch everything the dashboard shows. Individual failures stay inside
/// [`DashboardData`]; this never fails as a whole.
pub async fn fetch_dashboard_data(providers: &Providers, market: Option<Market>) -> DashboardData {
    let season_matches = providers.football.fetch_season_matches(providers.season).await;
    let fixtures = providers.football.fetch_scheduled_fixtures().await;
    let standings = providers.football.fetch_standings().await;

    let mut query = providers.odds_query;
    if let Some(market) = market {
        query.market = market;
    }
    let odds = providers.odds.fetch_odds(query).await;

    DashboardData {
        season_matches,
        fixtures,
        standings,
        odds,
        display_utc_offset_hours: providers.display_utc_offset_hours,
    }
}
