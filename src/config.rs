use crate::error::ConfigError;
use crate::models::{Market, OddsFormat};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_FOOTBALL_DATA_BASE_URL: &str = "https://api.football-data.org/v4";
const DEFAULT_ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";

/// Runtime settings, read once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub football_api_key: String,
    pub odds_api_key: String,
    pub football_data_base_url: String,
    pub odds_api_base_url: String,
    /// football-data.org competition code, e.g. "PL"
    pub competition: String,
    pub season: u16,
    /// the-odds-api sport key, e.g. "soccer_epl"
    pub odds_sport: String,
    pub odds_regions: String,
    pub odds_market: Market,
    pub odds_format: OddsFormat,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
    /// Hours added to UTC kickoff times when displaying fixtures
    pub display_utc_offset_hours: i32,
    pub bind_addr: String,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let football_api_key = required("FOOTBALL_API_KEY")?;
        let odds_api_key = required("ODDS_API_KEY")?;

        Ok(Self {
            football_api_key,
            odds_api_key,
            football_data_base_url: get("FOOTBALL_DATA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FOOTBALL_DATA_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            odds_api_base_url: get("ODDS_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ODDS_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            competition: get("COMPETITION").unwrap_or_else(|| "PL".to_string()),
            season: parse_or("SEASON", get("SEASON"), 2024)?,
            odds_sport: get("ODDS_SPORT").unwrap_or_else(|| "soccer_epl".to_string()),
            odds_regions: get("ODDS_REGIONS").unwrap_or_else(|| "eu".to_string()),
            odds_market: parse_or("ODDS_MARKET", get("ODDS_MARKET"), Market::H2h)?,
            odds_format: parse_or("ODDS_FORMAT", get("ODDS_FORMAT"), OddsFormat::Decimal)?,
            cache_ttl: Duration::from_secs(parse_or(
                "CACHE_TTL_SECS",
                get("CACHE_TTL_SECS"),
                3600u64,
            )?),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                10u64,
            )?),
            display_utc_offset_hours: utc_offset_hours(get("DISPLAY_UTC_OFFSET_HOURS"))?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// Whole-hour display offsets are limited to what a fixed offset can express.
fn utc_offset_hours(raw: Option<String>) -> Result<i32, ConfigError> {
    const KEY: &str = "DISPLAY_UTC_OFFSET_HOURS";
    let hours = parse_or(KEY, raw.clone(), 7i32)?;
    if (-23..=23).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            key: KEY,
            value: raw.unwrap_or_default(),
        })
    }
}
