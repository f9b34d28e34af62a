use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod alerts;
mod db;
mod models;
mod parameters;
mod report;
mod wqi;

#[derive(Parser)]
#[command(name = "water-quality-index")]
#[command(about = "Water quality index scoring and alerting for monitored locations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load sample locations, parameter limits, and readings
    Seed,
    /// Import readings from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Score the water quality index per location
    Score {
        #[arg(long)]
        location: Option<String>,
        /// Emit the index as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List active threshold alerts
    Alerts {
        #[arg(long)]
        location: Option<String>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let summary = db::import_csv(&pool, &csv).await?;
            println!(
                "Inserted {} readings from {} ({} skipped).",
                summary.inserted,
                csv.display(),
                summary.skipped
            );
        }
        Commands::Score { location, json } => {
            let readings = db::fetch_latest_readings(&pool, location.as_deref()).await?;
            let indexes = wqi::score_locations(&readings);

            if json {
                // Always JSON here, even when empty, for machine consumers.
                println!("{}", serde_json::to_string_pretty(&indexes)?);
            } else if indexes.is_empty() {
                println!("No readings found.");
            } else {
                println!("Water quality index by location:");
                for entry in indexes.iter() {
                    match (entry.index.score, entry.index.category, entry.index.risk_level) {
                        (Some(score), Some(category), Some(risk_level)) => println!(
                            "- {} score {:.2} ({}, risk {}) across {} parameters",
                            entry.location_name,
                            score,
                            category,
                            risk_level,
                            entry.index.parameters_used
                        ),
                        _ => println!("- {}: no scoreable readings", entry.location_name),
                    }
                }
            }
        }
        Commands::Alerts { location } => {
            let readings = db::fetch_latest_readings(&pool, location.as_deref()).await?;
            let active = alerts::evaluate_all(&readings);

            if active.is_empty() {
                println!("No active alerts.");
            } else {
                println!("Active alerts:");
                for alert in active.iter() {
                    println!("- [{}] {}", alert.severity, alert.message);
                }
            }
        }
        Commands::Report { location, out } => {
            let readings = db::fetch_latest_readings(&pool, location.as_deref()).await?;
            let report = report::build_report(location.as_deref(), &readings);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
