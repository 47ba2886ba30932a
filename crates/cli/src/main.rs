use anyhow::Context;
use clap::Parser;
use intellifactory_core::detector::DetectionThresholds;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod anomalies;
mod cli;
mod detect;
mod menu;
mod report;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intellifactory_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = intellifactory_db::create_pool(&database_url).context("invalid DATABASE_URL")?;
    intellifactory_db::run_migrations(&pool)
        .await
        .context("failed to prepare database schema")?;

    let thresholds = DetectionThresholds::from_env().context("invalid detection threshold")?;

    match cli.command {
        Command::Detect { csv, keep_existing } => {
            report::detect(&pool, &csv, &thresholds, keep_existing).await?
        }
        Command::List { limit } => anomalies::list(&pool, limit).await?,
        Command::Search { machine_id, limit } => {
            anomalies::search(&pool, &machine_id, limit).await?
        }
        Command::Export { output, limit } => {
            anomalies::export(&pool, &output, limit).await?;
        }
        Command::Clear => {
            anomalies::clear(&pool).await?;
        }
        Command::Menu => menu::run(&pool, &thresholds).await?,
    }

    pool.close().await;
    Ok(())
}
