use async_trait::async_trait;
use epl_predictor::cache::ManualClock;
use epl_predictor::classifier::MatchSelection;
use epl_predictor::{
    fetch_dashboard_data, render, ApiGateway, ApiRequest, Config, FetchError, Market, Outcome,
    Providers, Transport, TransportResponse,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers by URL suffix and records every request it sees.
struct RoutingTransport {
    calls: AtomicUsize,
    seen: Mutex<Vec<ApiRequest>>,
    standings_status: u16,
}

impl RoutingTransport {
    fn new(standings_status: u16) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            standings_status,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn finished(home: &str, away: &str, hg: u32, ag: u32) -> serde_json::Value {
    json!({
        "utcDate": "2024-08-17T14:00:00Z",
        "homeTeam": { "name": home },
        "awayTeam": { "name": away },
        "score": { "fullTime": { "home": hg, "away": ag } }
    })
}

fn scheduled(home: &str, away: &str) -> serde_json::Value {
    json!({
        "utcDate": "2025-05-25T15:00:00Z",
        "homeTeam": { "name": home },
        "awayTeam": { "name": away },
        "score": { "fullTime": { "home": null, "away": null } }
    })
}

#[async_trait]
impl Transport for RoutingTransport {
    async fn get(&self, request: &ApiRequest) -> Result<TransportResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());

        let has_query = |k: &str, v: &str| request.query.iter().any(|(qk, qv)| qk == k && qv == v);

        let (status, body) = if request.url.ends_with("/standings") {
            (self.standings_status, json!({ "standings": [] }))
        } else if request.url.ends_with("/matches") && has_query("status", "SCHEDULED") {
            (200, json!({ "matches": [scheduled("Chelsea", "Arsenal")] }))
        } else if request.url.ends_with("/matches") {
            let mut matches = Vec::new();
            for _ in 0..2 {
                matches.push(finished("Arsenal", "Wolves", 2, 0));
                matches.push(finished("Wolves", "Arsenal", 0, 2));
                matches.push(finished("Chelsea", "Wolves", 1, 1));
            }
            matches.push(scheduled("Chelsea", "Arsenal"));
            (200, json!({ "matches": matches }))
        } else if request.url.ends_with("/odds") {
            (
                200,
                json!([
                    { "home_team": "Everton", "away_team": "Fulham", "bookmakers": [] },
                    {
                        "home_team": "Chelsea",
                        "away_team": "Arsenal",
                        "bookmakers": [{
                            "title": "Pinnacle",
                            "markets": [{ "key": "h2h", "outcomes": [
                                { "name": "Chelsea", "price": 2.9 },
                                { "name": "Arsenal", "price": 2.5 },
                                { "name": "Draw", "price": 3.3 }
                            ]}]
                        }]
                    }
                ]),
            )
        } else {
            (404, json!({}))
        };

        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }
}

fn config() -> Config {
    Config::from_lookup(|key| match key {
        "FOOTBALL_API_KEY" => Some("football-token".to_string()),
        "ODDS_API_KEY" => Some("odds-token".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_full_pipeline_with_failing_standings() {
    let transport = Arc::new(RoutingTransport::new(500));
    let gateway = Arc::new(ApiGateway::new(transport.clone(), Duration::from_secs(3600)));
    let providers = Providers::with_gateway(gateway, &config());

    let data = fetch_dashboard_data(&providers, None).await;
    assert_eq!(data.standings, Err(FetchError::Status(500)));

    let selection = MatchSelection {
        home_team: "Arsenal".to_string(),
        away_team: "Wolves".to_string(),
    };
    let view = render(&data, Some(&selection));

    assert_eq!(view.played_count, 6);
    let prediction = view.prediction.expect("prediction");
    assert!(Outcome::ALL.contains(&prediction.outcome));

    assert_eq!(view.standings.len(), 1);
    assert!(view.standings[0].is_placeholder());

    assert_eq!(view.fixtures.len(), 1);
    assert_eq!(view.fixtures[0].kickoff, "25/05/2025 22:00");

    assert_eq!(view.odds.len(), 1);
    assert_eq!(view.odds[0].title, "Chelsea vs Arsenal");
    assert_eq!(view.warnings.len(), 1);
}

#[tokio::test]
async fn test_credentials_are_sent_but_not_cached_on() {
    let transport = Arc::new(RoutingTransport::new(200));
    let gateway = Arc::new(ApiGateway::new(transport.clone(), Duration::from_secs(3600)));
    let providers = Providers::with_gateway(gateway, &config());

    fetch_dashboard_data(&providers, None).await;

    let seen = transport.seen.lock().unwrap();
    let standings = seen.iter().find(|r| r.url.ends_with("/standings")).unwrap();
    assert!(standings
        .headers
        .contains(&("X-Auth-Token".to_string(), "football-token".to_string())));

    let odds = seen.iter().find(|r| r.url.ends_with("/odds")).unwrap();
    assert!(odds
        .secret_query
        .contains(&("apiKey".to_string(), "odds-token".to_string())));
    assert!(odds.query.contains(&("markets".to_string(), "h2h".to_string())));
    assert!(!odds.query.iter().any(|(k, _)| k == "apiKey"));
}

#[tokio::test]
async fn test_second_render_within_ttl_reuses_responses() {
    let transport = Arc::new(RoutingTransport::new(200));
    let clock = ManualClock::new();
    let gateway = Arc::new(ApiGateway::with_clock(
        transport.clone(),
        Duration::from_secs(3600),
        Arc::new(clock.clone()),
    ));
    let providers = Providers::with_gateway(gateway, &config());

    let first = fetch_dashboard_data(&providers, None).await;
    assert_eq!(transport.calls(), 4);

    let second = fetch_dashboard_data(&providers, None).await;
    assert_eq!(transport.calls(), 4);
    assert_eq!(first.season_matches, second.season_matches);
    assert_eq!(first.odds, second.odds);

    // a different market is a different cache entry
    fetch_dashboard_data(&providers, Some(Market::Spreads)).await;
    assert_eq!(transport.calls(), 5);

    clock.advance(Duration::from_secs(3600));
    fetch_dashboard_data(&providers, None).await;
    assert_eq!(transport.calls(), 9);
}
