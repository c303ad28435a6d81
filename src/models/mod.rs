use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A match as reported by the fixtures provider, played or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    /// `None` until the match has been played
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub kickoff: DateTime<Utc>,
}

/// Result of a match from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    AwayWin,
    Draw,
    HomeWin,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::AwayWin, Outcome::Draw, Outcome::HomeWin];

    pub fn from_goal_diff(goal_diff: i32) -> Self {
        match goal_diff.signum() {
            1 => Outcome::HomeWin,
            -1 => Outcome::AwayWin,
            _ => Outcome::Draw,
        }
    }

    /// +1 home win, 0 draw, -1 away win
    pub fn as_i8(self) -> i8 {
        match self {
            Outcome::HomeWin => 1,
            Outcome::Draw => 0,
            Outcome::AwayWin => -1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "🏠 Home win",
            Outcome::Draw => "⚖ Draw",
            Outcome::AwayWin => "🛫 Away win",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A completed match. The outcome is always derived from the goal difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayedMatch {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub kickoff: DateTime<Utc>,
}

impl PlayedMatch {
    /// Returns `None` unless both goal counts are present.
    pub fn from_record(record: &MatchRecord) -> Option<Self> {
        Some(Self {
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
            home_goals: record.home_goals?,
            away_goals: record.away_goals?,
            kickoff: record.kickoff,
        })
    }

    /// Home goals minus away goals; positive favors home
    pub fn goal_diff(&self) -> i32 {
        self.home_goals as i32 - self.away_goals as i32
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_goal_diff(self.goal_diff())
    }
}

/// One row of the league table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub position: u32,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: i32,
}

/// Odds market requested from the odds provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Moneyline
    H2h,
    /// Handicap
    Spreads,
}

impl Market {
    pub fn as_str(self) -> &'static str {
        match self {
            Market::H2h => "h2h",
            Market::Spreads => "spreads",
        }
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h2h" => Ok(Market::H2h),
            "spreads" => Ok(Market::Spreads),
            other => Err(format!("unknown market: {}", other)),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OddsFormat {
    Decimal,
    American,
}

impl OddsFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OddsFormat::Decimal => "decimal",
            OddsFormat::American => "american",
        }
    }
}

impl FromStr for OddsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decimal" => Ok(OddsFormat::Decimal),
            "american" => Ok(OddsFormat::American),
            other => Err(format!("unknown odds format: {}", other)),
        }
    }
}

/// A single priced outcome (e.g. "Arsenal" @ 1.85, optionally with a handicap point)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsOffer {
    pub label: String,
    pub price: f64,
    pub point: Option<f64>,
}

/// Quotes for one match, taken from the first bookmaker's first market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub home_team: String,
    pub away_team: String,
    pub bookmaker: String,
    pub market: String,
    pub offers: Vec<OddsOffer>,
}
