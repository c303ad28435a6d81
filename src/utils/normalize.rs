use crate::models::{MatchRecord, PlayedMatch};

/// Number of most recent matches that make up a team's form
pub const FORM_WINDOW: usize = 5;

/// Which side of the fixture a team played on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Home,
    Away,
}

/// Keep only played matches, in the order the provider returned them.
///
/// Recent-form calculations rely on that order being chronological, so nothing
/// here sorts.
pub fn normalize(records: &[MatchRecord]) -> Vec<PlayedMatch> {
    records.iter().filter_map(PlayedMatch::from_record).collect()
}

/// Mean goal differential of `team`'s last [`FORM_WINDOW`] matches in `role`.
///
/// Returns `None` when the team has no qualifying match.
pub fn recent_form(matches: &[PlayedMatch], team: &str, role: Role) -> Option<f64> {
    let diffs: Vec<i32> = matches
        .iter()
        .filter(|m| match role {
            Role::Home => m.home_team == team,
            Role::Away => m.away_team == team,
        })
        .map(PlayedMatch::goal_diff)
        .collect();

    if diffs.is_empty() {
        return None;
    }

    let recent = &diffs[diffs.len().saturating_sub(FORM_WINDOW)..];
    Some(recent.iter().map(|&d| d as f64).sum::<f64>() / recent.len() as f64)
}

/// Distinct home teams and distinct away teams, each in first-appearance order
pub fn team_lists(matches: &[PlayedMatch]) -> (Vec<String>, Vec<String>) {
    let mut home = Vec::new();
    let mut away = Vec::new();
    for m in matches {
        if !home.contains(&m.home_team) {
            home.push(m.home_team.clone());
        }
        if !away.contains(&m.away_team) {
            away.push(m.away_team.clone());
        }
    }
    (home, away)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(day: i64, home: &str, away: &str, goals: Option<(u32, u32)>) -> MatchRecord {
        MatchRecord {
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: goals.map(|g| g.0),
            away_goals: goals.map(|g| g.1),
            kickoff: Utc.with_ymd_and_hms(2024, 8, 17, 14, 0, 0).unwrap() + Duration::days(day),
        }
    }

    fn played(home: &str, away: &str, hg: u32, ag: u32) -> PlayedMatch {
        PlayedMatch::from_record(&record(0, home, away, Some((hg, ag)))).unwrap()
    }

    #[test]
    fn test_normalize_drops_unplayed_and_keeps_order() {
        let records = vec![
            record(0, "Arsenal", "Wolves", Some((2, 0))),
            record(1, "Everton", "Brighton", None),
            record(2, "Chelsea", "Man City", Some((0, 2))),
            record(3, "Fulham", "Leicester", None),
            record(4, "Ipswich", "Liverpool", Some((1, 1))),
        ];
        let out = normalize(&records);
        let homes: Vec<&str> = out.iter().map(|m| m.home_team.as_str()).collect();
        assert_eq!(homes, vec!["Arsenal", "Chelsea", "Ipswich"]);
        assert!(out.windows(2).all(|w| w[0].kickoff <= w[1].kickoff));
    }

    #[test]
    fn test_normalize_drops_half_reported_scores() {
        let mut half = record(0, "Arsenal", "Wolves", Some((2, 0)));
        half.away_goals = None;
        assert!(normalize(&[half]).is_empty());
    }

    #[test]
    fn test_recent_form_uses_last_five_in_role() {
        let matches = vec![
            played("Arsenal", "A", 9, 0), // outside the window
            played("Arsenal", "B", 1, 0),
            played("C", "Arsenal", 5, 0), // away, ignored for home form
            played("Arsenal", "D", 2, 0),
            played("Arsenal", "E", 0, 1),
            played("Arsenal", "F", 3, 3),
            played("Arsenal", "G", 4, 1),
        ];
        let form = recent_form(&matches, "Arsenal", Role::Home).unwrap();
        assert!((form - (1.0 + 2.0 - 1.0 + 0.0 + 3.0) / 5.0).abs() < 1e-12);

        let away = recent_form(&matches, "Arsenal", Role::Away).unwrap();
        assert_eq!(away, 5.0);
    }

    #[test]
    fn test_recent_form_with_fewer_than_five() {
        let matches = vec![played("Spurs", "A", 3, 1), played("Spurs", "B", 0, 1)];
        assert_eq!(recent_form(&matches, "Spurs", Role::Home), Some(0.5));
    }

    #[test]
    fn test_recent_form_without_matches_is_none() {
        let matches = vec![played("Spurs", "A", 3, 1)];
        assert_eq!(recent_form(&matches, "Spurs", Role::Away), None);
        assert_eq!(recent_form(&[], "Spurs", Role::Home), None);
    }

    #[test]
    fn test_team_lists_first_appearance_order() {
        let matches = vec![
            played("Spurs", "Leeds", 1, 0),
            played("Arsenal", "Spurs", 1, 0),
            played("Spurs", "Arsenal", 1, 0),
        ];
        let (home, away) = team_lists(&matches);
        assert_eq!(home, vec!["Spurs", "Arsenal"]);
        assert_eq!(away, vec!["Leeds", "Spurs", "Arsenal"]);
    }
}
