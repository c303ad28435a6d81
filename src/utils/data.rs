use crate::models::{PlayedMatch, StandingsRow};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct PlayedMatchCsvRow<'a> {
    kickoff: String,
    home_team: &'a str,
    away_team: &'a str,
    home_goals: u32,
    away_goals: u32,
    goal_diff: i32,
    result: i8,
}

/// Write played matches as CSV, one row per match, with derived columns
pub fn write_played_matches_csv<W: Write>(matches: &[PlayedMatch], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for m in matches {
        csv.serialize(PlayedMatchCsvRow {
            kickoff: m.kickoff.to_rfc3339(),
            home_team: &m.home_team,
            away_team: &m.away_team,
            home_goals: m.home_goals,
            away_goals: m.away_goals,
            goal_diff: m.goal_diff(),
            result: m.outcome().as_i8(),
        })
        .context("Failed to write played match row")?;
    }
    csv.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Write the league table as CSV
pub fn write_standings_csv<W: Write>(rows: &[StandingsRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row).context("Failed to write standings row")?;
    }
    csv.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Save played matches to `<dir>/played_matches.csv`
pub fn save_played_matches_to_csv(matches: &[PlayedMatch], dir: &Path) -> Result<()> {
    let path = dir.join("played_matches.csv");
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_played_matches_csv(matches, file)
}

/// Save standings to `<dir>/standings.csv`
pub fn save_standings_to_csv(rows: &[StandingsRow], dir: &Path) -> Result<()> {
    let path = dir.join("standings.csv");
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_standings_csv(rows, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchRecord;

    fn played(hg: u32, ag: u32) -> PlayedMatch {
        PlayedMatch::from_record(&MatchRecord {
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            home_goals: Some(hg),
            away_goals: Some(ag),
            kickoff: "2024-08-17T14:00:00Z".parse().unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_played_matches_csv_has_derived_columns() {
        let mut out = Vec::new();
        write_played_matches_csv(&[played(0, 2), played(1, 1)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "kickoff,home_team,away_team,home_goals,away_goals,goal_diff,result"
        );
        assert_eq!(lines[1], "2024-08-17T14:00:00+00:00,Arsenal,Chelsea,0,2,-2,-1");
        assert!(lines[2].ends_with(",0,0"));
    }

    #[test]
    fn test_save_standings_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![StandingsRow {
            position: 1,
            team: "Liverpool FC".to_string(),
            played: 38,
            won: 25,
            draw: 9,
            lost: 4,
            goals_for: 86,
            goals_against: 41,
            points: 84,
        }];
        save_standings_to_csv(&rows, dir.path()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("standings.csv")).unwrap();
        assert!(text.starts_with("position,team,played"));
        assert!(text.contains("1,Liverpool FC,38,25,9,4,86,41,84"));
    }
}
