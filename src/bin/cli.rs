use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use epl_predictor::classifier::MatchSelection;
use epl_predictor::data::{save_played_matches_to_csv, save_standings_to_csv};
use epl_predictor::normalize::normalize;
use epl_predictor::{fetch_dashboard_data, render, Config, Market, Providers};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "epl", about = "Premier League match predictor")]
struct Cli {
    /// Also write played_matches.csv and standings.csv into this directory
    #[arg(long, global = true)]
    save_csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the outcome of a fixture from both teams' recent form
    Predict {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
    },
    /// List the teams available for prediction
    Teams,
    /// Show the next upcoming fixtures
    Fixtures,
    /// Show the league table
    Standings,
    /// Show the latest odds
    Odds {
        /// h2h (moneyline) or spreads (handicap)
        #[arg(long)]
        market: Option<Market>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    // Fail fast on missing credentials
    let config = Config::from_env()?;
    let providers = Providers::from_config(&config)?;

    let market = match &cli.command {
        Command::Odds { market } => *market,
        _ => None,
    };
    let data = fetch_dashboard_data(&providers, market).await;

    let selection = match &cli.command {
        Command::Predict { home, away } => Some(MatchSelection {
            home_team: home.clone(),
            away_team: away.clone(),
        }),
        _ => None,
    };
    let view = render(&data, selection.as_ref());

    for warning in &view.warnings {
        eprintln!("⚠️  {}", warning);
    }

    match cli.command {
        Command::Predict { .. } => {
            if let Some(error) = &view.prediction_error {
                println!("{}", error);
            }
            if let Some(prediction) = &view.prediction {
                println!(
                    "{} vs {}: {}",
                    prediction.home_team,
                    prediction.away_team,
                    prediction.label()
                );
                println!(
                    "  home form {} | away form {} | feature {:+.2}",
                    format_form(prediction.home_form),
                    format_form(prediction.away_form),
                    prediction.feature
                );
                if view.model_converged == Some(false) {
                    println!("  (model did not fully converge)");
                }
            }
        }
        Command::Teams => {
            println!("HOME TEAMS\n");
            for team in &view.home_teams {
                println!("  {}", team);
            }
            println!("\nAWAY TEAMS\n");
            for team in &view.away_teams {
                println!("  {}", team);
            }
        }
        Command::Fixtures => {
            if view.fixtures.is_empty() {
                println!("No upcoming fixtures.");
            }
            for fixture in &view.fixtures {
                println!(
                    "{} vs {}  🕓 {}",
                    fixture.home_team, fixture.away_team, fixture.kickoff
                );
            }
        }
        Command::Standings => {
            println!(
                "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4}",
                "#", "Team", "P", "W", "D", "L", "GF", "GA", "Pts"
            );
            for row in &view.standings {
                println!(
                    "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4}",
                    row.position,
                    row.team,
                    row.played,
                    row.won,
                    row.draw,
                    row.lost,
                    row.goals_for,
                    row.goals_against,
                    row.points
                );
            }
        }
        Command::Odds { .. } => {
            if view.odds.is_empty() {
                println!("No odds available.");
            }
            for listing in &view.odds {
                println!("{} ({})", listing.title, listing.bookmaker);
                for line in &listing.lines {
                    println!("  ➡ {}: {}", line.label, line.price);
                }
            }
        }
    }

    if let Some(dir) = cli.save_csv {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        if let Ok(records) = &data.season_matches {
            save_played_matches_to_csv(&normalize(records), &dir)?;
        }
        if let Ok(rows) = &data.standings {
            save_standings_to_csv(rows, &dir)?;
        }
        println!("\nSaved CSV files to {}", dir.display());
    }

    Ok(())
}

fn format_form(form: Option<f64>) -> String {
    match form {
        Some(v) => format!("{:+.2}", v),
        None => "n/a (0 used)".to_string(),
    }
}
