use crate::error::FetchError;
use crate::models::{MatchRecord, OddsQuote, StandingsRow};
use chrono::FixedOffset;
use serde::Serialize;

/// How many fixtures / odds entries the dashboard lists
pub const LIST_LIMIT: usize = 10;

/// A standings row ready for display. Every cell is text so the placeholder
/// row can carry "-" and blanks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsTableRow {
    pub position: String,
    pub team: String,
    pub played: String,
    pub won: String,
    pub draw: String,
    pub lost: String,
    pub goals_for: String,
    pub goals_against: String,
    pub points: String,
}

impl StandingsTableRow {
    pub fn placeholder() -> Self {
        Self {
            position: String::new(),
            team: "⚠️ No standings data".to_string(),
            played: String::new(),
            won: String::new(),
            draw: String::new(),
            lost: String::new(),
            goals_for: String::new(),
            goals_against: String::new(),
            points: "-".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.position.is_empty()
    }
}

impl From<&StandingsRow> for StandingsTableRow {
    fn from(row: &StandingsRow) -> Self {
        Self {
            position: row.position.to_string(),
            team: row.team.clone(),
            played: row.played.to_string(),
            won: row.won.to_string(),
            draw: row.draw.to_string(),
            lost: row.lost.to_string(),
            goals_for: row.goals_for.to_string(),
            goals_against: row.goals_against.to_string(),
            points: row.points.to_string(),
        }
    }
}

/// Build the standings table; any failure or empty result becomes one placeholder row.
pub fn standings_table(standings: &Result<Vec<StandingsRow>, FetchError>) -> Vec<StandingsTableRow> {
    match standings {
        Ok(rows) if !rows.is_empty() => rows.iter().map(StandingsTableRow::from).collect(),
        _ => vec![StandingsTableRow::placeholder()],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureRow {
    pub home_team: String,
    pub away_team: String,
    /// Kickoff in the display time zone, `%d/%m/%Y %H:%M`
    pub kickoff: String,
}

/// First [`LIST_LIMIT`] fixtures with kickoff shifted by `utc_offset_hours`.
/// An offset no fixed zone can represent falls back to UTC.
pub fn fixture_rows(fixtures: &[MatchRecord], utc_offset_hours: i32) -> Vec<FixtureRow> {
    let offset = utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt);
    fixtures
        .iter()
        .take(LIST_LIMIT)
        .map(|fixture| {
            let kickoff = match offset {
                Some(offset) => fixture.kickoff.with_timezone(&offset).naive_local(),
                None => fixture.kickoff.naive_utc(),
            };
            FixtureRow {
                home_team: fixture.home_team.clone(),
                away_team: fixture.away_team.clone(),
                kickoff: kickoff.format("%d/%m/%Y %H:%M").to_string(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsLine {
    pub label: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsListing {
    pub title: String,
    pub bookmaker: String,
    pub lines: Vec<OddsLine>,
}

/// First [`LIST_LIMIT`] quotes, formatted for display
pub fn odds_listings(quotes: &[OddsQuote]) -> Vec<OddsListing> {
    quotes
        .iter()
        .take(LIST_LIMIT)
        .map(|quote| OddsListing {
            title: format!("{} vs {}", quote.home_team, quote.away_team),
            bookmaker: quote.bookmaker.clone(),
            lines: quote
                .offers
                .iter()
                .map(|offer| OddsLine {
                    label: match offer.point {
                        Some(point) => format!("{} ({:+})", offer.label, point),
                        None => offer.label.clone(),
                    },
                    price: format!("{}", offer.price),
                })
                .collect(),
        })
        .collect()
}
