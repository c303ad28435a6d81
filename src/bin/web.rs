use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use epl_predictor::classifier::MatchSelection;
use epl_predictor::{fetch_dashboard_data, render, Config, DashboardView, Market, Providers};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

// Custom filters for formatting
mod filters {
    pub fn form(value: &Option<f64>) -> ::askama::Result<String> {
        Ok(match value {
            Some(v) => format!("{:+.2}", v),
            None => "n/a (0 used)".to_string(),
        })
    }

    pub fn signed(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:+.2}", value))
    }
}

#[derive(Template)]
#[template(path = "predict.html")]
struct PredictTemplate {
    active_page: String,
    view: DashboardView,
    selected_home: String,
    selected_away: String,
}

#[derive(Template)]
#[template(path = "standings.html")]
struct StandingsTemplate {
    active_page: String,
    view: DashboardView,
}

#[derive(Template)]
#[template(path = "odds.html")]
struct OddsTemplate {
    active_page: String,
    view: DashboardView,
    market: String,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

type SharedProviders = Arc<Providers>;

#[derive(Debug, Deserialize)]
struct PredictParams {
    home: Option<String>,
    away: Option<String>,
}

impl PredictParams {
    fn selection(&self) -> Option<MatchSelection> {
        let home = self.home.as_deref().filter(|s| !s.is_empty())?;
        let away = self.away.as_deref().filter(|s| !s.is_empty())?;
        Some(MatchSelection {
            home_team: home.to_string(),
            away_team: away.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OddsParams {
    market: Option<String>,
}

async fn predict(
    State(providers): State<SharedProviders>,
    Query(params): Query<PredictParams>,
) -> impl IntoResponse {
    let data = fetch_dashboard_data(&providers, None).await;
    let selection = params.selection();
    let view = render(&data, selection.as_ref());

    let template = PredictTemplate {
        active_page: "predict".to_string(),
        view,
        selected_home: params.home.unwrap_or_default(),
        selected_away: params.away.unwrap_or_default(),
    };

    HtmlTemplate(template)
}

async fn standings(State(providers): State<SharedProviders>) -> impl IntoResponse {
    let data = fetch_dashboard_data(&providers, None).await;

    let template = StandingsTemplate {
        active_page: "standings".to_string(),
        view: render(&data, None),
    };

    HtmlTemplate(template)
}

async fn odds(
    State(providers): State<SharedProviders>,
    Query(params): Query<OddsParams>,
) -> Response {
    let market = match params.market.as_deref().map(str::parse::<Market>) {
        Some(Ok(market)) => market,
        Some(Err(e)) => return (StatusCode::BAD_REQUEST, e).into_response(),
        None => providers.odds_query.market,
    };
    let data = fetch_dashboard_data(&providers, Some(market)).await;

    let template = OddsTemplate {
        active_page: "odds".to_string(),
        view: render(&data, None),
        market: market.to_string(),
    };

    HtmlTemplate(template).into_response()
}

fn app(providers: SharedProviders) -> Router {
    Router::new()
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(predict))
        .route("/standings", get(standings))
        .route("/odds", get(odds))
        .with_state(providers)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Fail fast on missing credentials
    let config = Config::from_env()?;
    let providers = Arc::new(Providers::from_config(&config)?);

    tracing::info!(addr = %config.bind_addr, "starting web server");
    println!("\nStarting web server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app(providers)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use epl_predictor::{ApiGateway, ApiRequest, FetchError, Transport, TransportResponse};
    use std::time::Duration;
    use tower::ServiceExt;

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn get(&self, _request: &ApiRequest) -> Result<TransportResponse, FetchError> {
            Ok(TransportResponse {
                status: 500,
                body: String::new(),
            })
        }
    }

    fn test_app() -> Router {
        let config = Config::from_lookup(|key| match key {
            "FOOTBALL_API_KEY" | "ODDS_API_KEY" => Some("test".to_string()),
            _ => None,
        })
        .unwrap();
        let gateway = Arc::new(ApiGateway::new(Arc::new(FailingTransport), Duration::from_secs(60)));
        app(Arc::new(Providers::with_gateway(gateway, &config)))
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_standings_page_shows_placeholder_when_provider_fails() {
        let (status, body) = get_body("/standings").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No standings data"));
    }

    #[tokio::test]
    async fn test_predict_page_degrades_without_matches() {
        let (status, body) = get_body("/?home=Arsenal&away=Chelsea").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("predictions are unavailable"));
    }

    #[tokio::test]
    async fn test_odds_page_rejects_unknown_market() {
        let (status, _) = get_body("/odds?market=totals").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_body("/odds?market=spreads").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not load odds"));
    }
}
