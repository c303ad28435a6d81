//! Turns fetched provider data into everything the three dashboard tabs show.
//!
//! `render` is pure: the caller fetches, then calls it once per user action.

use crate::error::FetchError;
use crate::models::{MatchRecord, OddsQuote, StandingsRow};
use crate::utils::classifier::{predict_matchup, MatchSelection, MatchupPrediction, OutcomeClassifier};
use crate::utils::normalize::{normalize, team_lists};
use crate::utils::tables::{
    fixture_rows, odds_listings, standings_table, FixtureRow, OddsListing, StandingsTableRow,
};
use serde::Serialize;

/// Raw inputs for one render, as returned by the providers
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub season_matches: Result<Vec<MatchRecord>, FetchError>,
    pub fixtures: Result<Vec<MatchRecord>, FetchError>,
    pub standings: Result<Vec<StandingsRow>, FetchError>,
    pub odds: Result<Vec<OddsQuote>, FetchError>,
    pub display_utc_offset_hours: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub played_count: usize,
    pub home_teams: Vec<String>,
    pub away_teams: Vec<String>,
    pub prediction: Option<MatchupPrediction>,
    /// Set when a prediction was asked for but the model could not be fit
    pub prediction_error: Option<String>,
    pub model_converged: Option<bool>,
    pub fixtures: Vec<FixtureRow>,
    pub standings: Vec<StandingsTableRow>,
    pub odds: Vec<OddsListing>,
    pub warnings: Vec<String>,
}

pub fn render(data: &DashboardData, selection: Option<&MatchSelection>) -> DashboardView {
    let mut warnings = Vec::new();

    let played = match &data.season_matches {
        Ok(records) => normalize(records),
        Err(e) => {
            warnings.push(format!("Could not load match results: {}", e));
            Vec::new()
        }
    };
    if played.is_empty() && data.season_matches.is_ok() {
        warnings.push("No played matches available yet".to_string());
    }

    let (home_teams, away_teams) = team_lists(&played);

    let model = if played.is_empty() {
        None
    } else {
        Some(OutcomeClassifier::fit(&played))
    };

    let mut prediction = None;
    let mut prediction_error = None;
    if let Some(selection) = selection {
        match &model {
            Some(Ok(model)) => prediction = Some(predict_matchup(model, &played, selection)),
            Some(Err(e)) => prediction_error = Some(format!("Cannot predict: {}", e)),
            None => prediction_error = Some("Cannot predict: no played matches".to_string()),
        }
    }

    let fixtures = match &data.fixtures {
        Ok(records) => fixture_rows(records, data.display_utc_offset_hours),
        Err(e) => {
            warnings.push(format!("Could not load upcoming fixtures: {}", e));
            Vec::new()
        }
    };

    if let Err(e) = &data.standings {
        warnings.push(format!("Could not load standings: {}", e));
    }
    let standings = standings_table(&data.standings);

    let odds = match &data.odds {
        Ok(quotes) => odds_listings(quotes),
        Err(e) => {
            warnings.push(format!("Could not load odds: {}", e));
            Vec::new()
        }
    };

    DashboardView {
        played_count: played.len(),
        home_teams,
        away_teams,
        prediction,
        prediction_error,
        model_converged: model.as_ref().and_then(|m| m.as_ref().ok()).map(|m| m.converged()),
        fixtures,
        standings,
        odds,
        warnings,
    }
}
