//! Seed the database from scraped DIGG data
//!
//! Combines the scraped collections with the hubs policy (status overrides
//! and curated organization coordinates) and upserts everything in one
//! transaction.

use anyhow::{Context, Result};
use chrono::Utc;
use hubs_map_core::common::ScrapedData;
use hubs_map_core::domains::hubs_policy::HubsPolicy;
use hubs_map_core::domains::seeding::{apply_seed, plan_seed};
use hubs_map_core::{init_tracing, Config};
use sqlx::{ConnectOptions, Connection};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    // Parse before any file or database work so a bad URL fails fast
    let database = config.database()?;
    let policy = HubsPolicy::load(config.hubs_policy_path.as_deref())
        .context("Failed to load hubs policy")?;

    let data = ScrapedData::load_dir(&config.scraped_data_dir)
        .context("Failed to load scraped data")?;
    tracing::info!(entities = data.total(), "Loaded scraped data");

    tracing::info!(host = %database.host, database = %database.database, "Connecting to database...");
    let mut conn = database
        .connect_options()
        .connect()
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&mut conn)
        .await
        .context("Failed to run migrations")?;

    let plan = plan_seed(&data, &policy, Utc::now());
    let report = apply_seed(&mut conn, &plan).await?;

    println!(
        "Inserted/updated {} of {} municipalities",
        report.municipalities.written, report.municipalities.processed
    );
    println!(
        "Inserted/updated {} of {} regions",
        report.regions.written, report.regions.processed
    );
    println!(
        "Inserted/updated {} of {} organizations",
        report.organizations.written, report.organizations.processed
    );
    println!("Initialized {} system settings", report.settings_inserted);

    conn.close().await.context("Failed to close database connection")?;

    println!("✓ Database seeding complete!");
    Ok(())
}
